//! In-memory session token management
//!
//! Tokens are bearer credentials: every authenticated request carries one and
//! is authorized independently, so sessions are not tied to a connection.
//! Expired entries are purged lazily whenever a new token is created.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use rand::RngExt;

use strato_common::validators::TOKEN_HEX_LENGTH;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// An authenticated session bound to a token
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: i64,
    pub username: String,
    expires_at: Instant,
}

/// Session store shared across all connections
///
/// Uses `Arc` internally, so cloning is cheap.
#[derive(Clone)]
pub struct SessionManager {
    ttl: Duration,
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionManager {
    /// Create a new session manager with the given token lifetime
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Token lifetime in seconds, as advertised to clients at login
    #[must_use]
    pub fn ttl_secs(&self) -> u64 {
        self.ttl.as_secs()
    }

    /// Create a session for a user and return the new token
    ///
    /// Also purges expired sessions, keeping the store bounded by the number
    /// of logins within one TTL window.
    pub fn create(&self, user_id: i64, username: &str) -> String {
        let token = generate_token();
        let session = Session {
            user_id,
            username: username.to_string(),
            expires_at: Instant::now() + self.ttl,
        };

        let mut sessions = self.sessions.write().expect("session lock poisoned");
        let now = Instant::now();
        sessions.retain(|_, s| s.expires_at > now);
        sessions.insert(token.clone(), session);
        token
    }

    /// Validate a token, returning the session it belongs to
    ///
    /// Expired tokens are removed and treated as unknown.
    pub fn validate(&self, token: &str) -> Option<Session> {
        // Fast path: read lock for valid tokens
        {
            let sessions = self.sessions.read().expect("session lock poisoned");
            match sessions.get(token) {
                Some(s) if s.expires_at > Instant::now() => return Some(s.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // Token exists but has expired - remove it
        let mut sessions = self.sessions.write().expect("session lock poisoned");
        sessions.remove(token);
        None
    }

    /// Number of live sessions (expired entries may still be counted)
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.read().expect("session lock poisoned").len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Generate a random session token (32 lowercase hex characters = 128 bits)
fn generate_token() -> String {
    let mut rng = rand::rng();
    let mut token = String::with_capacity(TOKEN_HEX_LENGTH);
    for _ in 0..TOKEN_HEX_LENGTH {
        token.push(HEX_DIGITS[rng.random_range(0..HEX_DIGITS.len())] as char);
    }
    token
}
