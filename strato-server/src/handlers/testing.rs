//! Shared test fixtures for handler tests

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use sqlx::SqlitePool;
use tempfile::TempDir;
use tokio::io::BufReader;
use tokio::net::TcpListener;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

use strato_common::framing::{FrameReader, FrameWriter, MessageId};
use strato_common::protocol::ServerMessage;

use crate::db::{Database, hash_password};
use crate::files::ensure_user_area;
use crate::handlers::{HandlerContext, current_timestamp};
use crate::sessions::SessionManager;

/// Everything a handler test needs: a connected socket pair, an in-memory
/// database, a session store and a temp file area.
pub struct TestContext {
    pub frame_reader: FrameReader<BufReader<OwnedReadHalf>>,
    pub frame_writer: FrameWriter<OwnedWriteHalf>,
    pub db: Database,
    pub sessions: SessionManager,
    pub peer_addr: SocketAddr,
    pub message_id: MessageId,
    pub file_root: &'static Path,
    // Held so the file area outlives the test
    _temp_dir: TempDir,
}

impl TestContext {
    /// Borrow the server side of the fixture as a handler context
    pub fn handler_context(&mut self) -> HandlerContext<'_, OwnedWriteHalf> {
        HandlerContext {
            frame_writer: &mut self.frame_writer,
            peer_addr: self.peer_addr,
            db: &self.db,
            sessions: &self.sessions,
            file_root: self.file_root,
            debug: false,
            message_id: self.message_id,
        }
    }
}

/// Create a test context with a real TCP socket pair
///
/// The writer half is the "server" side; the reader half is the "client"
/// side used to observe responses.
pub async fn create_test_context() -> TestContext {
    let pool = SqlitePool::connect(":memory:")
        .await
        .expect("Failed to create test database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    let db = Database::new(pool);

    let sessions = SessionManager::new(Duration::from_secs(3600));

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let canonical = temp_dir
        .path()
        .canonicalize()
        .expect("Failed to canonicalize temp dir");
    let file_root: &'static Path = Box::leak(canonical.into_boxed_path());

    // Real socket pair so frame IO behaves like production
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get address");
    let client = tokio::net::TcpStream::connect(addr)
        .await
        .expect("Failed to connect");
    let (server, _) = listener.accept().await.expect("Failed to accept");
    let peer_addr = server.peer_addr().expect("Failed to get peer address");

    let (_server_read, server_write) = server.into_split();
    let (client_read, _client_write) = client.into_split();

    TestContext {
        frame_reader: FrameReader::new(BufReader::new(client_read)),
        frame_writer: FrameWriter::new(server_write),
        db,
        sessions,
        peer_addr,
        message_id: MessageId::from_bytes(b"000000000000").expect("valid message id"),
        file_root,
        _temp_dir: temp_dir,
    }
}

/// Create a user account with a storage area and a live session token
pub async fn signup_user(ctx: &TestContext, username: &str, password: &str) -> String {
    let hash = hash_password(password, true).expect("Failed to hash password");
    let user = ctx
        .db
        .users
        .create_user(username, &hash, current_timestamp())
        .await
        .expect("Failed to create user");
    ensure_user_area(ctx.file_root, username).expect("Failed to create user area");
    ctx.sessions.create(user.id, username)
}

/// Read the next response from the client side of the fixture
pub async fn read_server_message(test_ctx: &mut TestContext) -> ServerMessage {
    strato_common::io::read_server_message(&mut test_ctx.frame_reader)
        .await
        .expect("Failed to read server message")
        .expect("Connection closed unexpectedly")
        .message
}
