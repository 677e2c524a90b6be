//! Authenticated browsing session
//!
//! Owns the connection, the bearer token and the navigation history. The
//! server holds no per-client filesystem state, so the session re-lists the
//! current directory after every mutation to stay in sync.

use std::fmt;

use tokio::io::{AsyncRead, AsyncWrite};

use strato_common::protocol::{ClientMessage, FileEntry, ServerMessage};
use strato_common::{ErrorCode, ErrorInfo};

use crate::connection::{RequestError, ServerConnection};
use crate::navigation::{NavigationHistory, join_virtual, parent_path};

/// Failure modes for session operations
#[derive(Debug)]
pub enum SessionError {
    /// Operation requires a token but none is held
    NotLoggedIn,
    /// The server rejected the operation
    Server(ErrorInfo),
    /// Transport failure
    Transport(RequestError),
    /// The server answered with the wrong response type
    UnexpectedResponse,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotLoggedIn => write!(f, "not logged in"),
            Self::Server(e) => write!(f, "{}", e.message),
            Self::Transport(e) => write!(f, "{}", e),
            Self::UnexpectedResponse => write!(f, "unexpected response from server"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<RequestError> for SessionError {
    fn from(err: RequestError) -> Self {
        Self::Transport(err)
    }
}

fn server_error(error: Option<ErrorInfo>) -> SessionError {
    SessionError::Server(error.unwrap_or_else(|| {
        ErrorInfo::new(ErrorCode::UnknownError, "operation failed")
    }))
}

/// A file browser session over one server connection
pub struct FileBrowserSession<R, W> {
    connection: ServerConnection<R, W>,
    token: Option<String>,
    history: NavigationHistory,
    entries: Vec<FileEntry>,
}

impl<R, W> FileBrowserSession<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(connection: ServerConnection<R, W>) -> Self {
        Self {
            connection,
            token: None,
            history: NavigationHistory::new(),
            entries: Vec::new(),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    /// The directory the session is currently showing
    pub fn current_path(&self) -> &str {
        self.history.current()
    }

    /// The cached listing of the current directory
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn can_go_back(&self) -> bool {
        self.history.can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.history.can_go_forward()
    }

    fn token(&self) -> Result<String, SessionError> {
        self.token.clone().ok_or(SessionError::NotLoggedIn)
    }

    /// Turn user input into an absolute virtual path
    pub fn resolve_input(&self, input: &str) -> String {
        join_virtual(self.current_path(), input)
    }

    /// Create an account and start browsing its empty root
    pub async fn signup(&mut self, username: &str, password: &str) -> Result<(), SessionError> {
        let response = self
            .connection
            .request(ClientMessage::Signup {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;

        match response {
            ServerMessage::SignupResponse {
                success: true,
                token: Some(token),
                ..
            } => {
                self.start_session(token).await;
                Ok(())
            }
            ServerMessage::SignupResponse { error, .. } => Err(server_error(error)),
            _ => Err(SessionError::UnexpectedResponse),
        }
    }

    /// Log in and start browsing from the root
    ///
    /// Returns the token lifetime in seconds when the server reports one.
    pub async fn login(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<Option<u64>, SessionError> {
        let response = self
            .connection
            .request(ClientMessage::Login {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;

        match response {
            ServerMessage::LoginResponse {
                success: true,
                token: Some(token),
                expires_in,
                ..
            } => {
                self.start_session(token).await;
                Ok(expires_in)
            }
            ServerMessage::LoginResponse { error, .. } => Err(server_error(error)),
            _ => Err(SessionError::UnexpectedResponse),
        }
    }

    async fn start_session(&mut self, token: String) {
        self.token = Some(token);
        self.history = NavigationHistory::new();
        // A failed initial listing just leaves the cache empty
        if let Ok(entries) = self.list("/").await {
            self.entries = entries;
        } else {
            self.entries.clear();
        }
    }

    async fn list(&mut self, path: &str) -> Result<Vec<FileEntry>, SessionError> {
        let token = self.token()?;
        let response = self
            .connection
            .request(ClientMessage::FileList {
                token,
                path: path.to_string(),
            })
            .await?;

        match response {
            ServerMessage::FileListResponse {
                success: true,
                entries: Some(entries),
                ..
            } => Ok(entries),
            ServerMessage::FileListResponse { error, .. } => Err(server_error(error)),
            _ => Err(SessionError::UnexpectedResponse),
        }
    }

    /// Re-list the current directory
    pub async fn refresh(&mut self) -> Result<(), SessionError> {
        let path = self.current_path().to_string();
        self.entries = self.list(&path).await?;
        Ok(())
    }

    /// Navigate into a directory
    ///
    /// The listing happens first; the history only records directories that
    /// were actually entered.
    pub async fn open(&mut self, input: &str) -> Result<(), SessionError> {
        let target = self.resolve_input(input);
        let entries = self.list(&target).await?;
        self.history.navigate_to(target);
        self.entries = entries;
        Ok(())
    }

    /// Go back in history, re-listing the directory landed on
    pub async fn back(&mut self) -> Result<(), SessionError> {
        let Some(target) = self.history.back_target().map(String::from) else {
            return Ok(());
        };
        self.entries = self.list(&target).await?;
        self.history.back();
        Ok(())
    }

    /// Go forward in history, re-listing the directory landed on
    pub async fn forward(&mut self) -> Result<(), SessionError> {
        let Some(target) = self.history.forward_target().map(String::from) else {
            return Ok(());
        };
        self.entries = self.list(&target).await?;
        self.history.forward();
        Ok(())
    }

    /// Navigate to the parent directory; the root is its own parent
    pub async fn up(&mut self) -> Result<(), SessionError> {
        let target = parent_path(self.current_path());
        let entries = self.list(&target).await?;
        self.history.navigate_to(target);
        self.entries = entries;
        Ok(())
    }

    /// Read a file's content
    pub async fn read_file(&mut self, input: &str) -> Result<String, SessionError> {
        let token = self.token()?;
        let path = self.resolve_input(input);
        let response = self
            .connection
            .request(ClientMessage::FileRead { token, path })
            .await?;

        match response {
            ServerMessage::FileReadResponse {
                success: true,
                content: Some(content),
                ..
            } => Ok(content),
            ServerMessage::FileReadResponse { error, .. } => Err(server_error(error)),
            _ => Err(SessionError::UnexpectedResponse),
        }
    }

    /// Create or overwrite a file, then refresh the listing
    pub async fn write_file(&mut self, input: &str, content: &str) -> Result<(), SessionError> {
        let token = self.token()?;
        let path = self.resolve_input(input);
        let response = self
            .connection
            .request(ClientMessage::FileWrite {
                token,
                path,
                content: content.to_string(),
            })
            .await?;

        match response {
            ServerMessage::FileWriteResponse { success: true, .. } => self.refresh().await,
            ServerMessage::FileWriteResponse { error, .. } => Err(server_error(error)),
            _ => Err(SessionError::UnexpectedResponse),
        }
    }

    /// Delete a file or directory, then refresh the listing
    pub async fn delete(&mut self, input: &str, recursive: bool) -> Result<(), SessionError> {
        let token = self.token()?;
        let path = self.resolve_input(input);
        let response = self
            .connection
            .request(ClientMessage::FileDelete {
                token,
                path,
                recursive,
            })
            .await?;

        match response {
            ServerMessage::FileDeleteResponse { success: true, .. } => self.refresh().await,
            ServerMessage::FileDeleteResponse { error, .. } => Err(server_error(error)),
            _ => Err(SessionError::UnexpectedResponse),
        }
    }

    /// Create a directory, then refresh the listing
    pub async fn create_dir(&mut self, input: &str) -> Result<(), SessionError> {
        let token = self.token()?;
        let path = self.resolve_input(input);
        let response = self
            .connection
            .request(ClientMessage::FileCreateDir { token, path })
            .await?;

        match response {
            ServerMessage::FileCreateDirResponse { success: true, .. } => self.refresh().await,
            ServerMessage::FileCreateDirResponse { error, .. } => Err(server_error(error)),
            _ => Err(SessionError::UnexpectedResponse),
        }
    }

    /// Rename or move, then refresh the listing
    pub async fn rename(&mut self, from: &str, to: &str) -> Result<(), SessionError> {
        let token = self.token()?;
        let path = self.resolve_input(from);
        let new_path = self.resolve_input(to);
        let response = self
            .connection
            .request(ClientMessage::FileRename {
                token,
                path,
                new_path,
            })
            .await?;

        match response {
            ServerMessage::FileRenameResponse { success: true, .. } => self.refresh().await,
            ServerMessage::FileRenameResponse { error, .. } => Err(server_error(error)),
            _ => Err(SessionError::UnexpectedResponse),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::io::{BufReader, DuplexStream, ReadHalf, WriteHalf};
    use tokio::task::JoinHandle;

    use strato_common::framing::{FrameReader, FrameWriter};
    use strato_common::io::{read_client_message, send_server_message_with_id};
    use strato_common::protocol::EntryKind;

    use super::*;

    type TestSession = FileBrowserSession<ReadHalf<DuplexStream>, WriteHalf<DuplexStream>>;

    fn dir_entry(name: &str) -> FileEntry {
        FileEntry {
            name: name.to_string(),
            kind: EntryKind::Directory,
            size: None,
        }
    }

    fn list_ok(path: &str, entries: Vec<FileEntry>) -> ServerMessage {
        ServerMessage::FileListResponse {
            success: true,
            path: Some(path.to_string()),
            entries: Some(entries),
            error: None,
        }
    }

    fn list_not_found() -> ServerMessage {
        ServerMessage::FileListResponse {
            success: false,
            path: None,
            entries: None,
            error: Some(ErrorInfo::new(
                ErrorCode::FileNotFound,
                "File or directory not found",
            )),
        }
    }

    fn login_ok() -> ServerMessage {
        ServerMessage::LoginResponse {
            success: true,
            token: Some("ffeeddccbbaa99887766554433221100".to_string()),
            expires_in: Some(3600),
            error: None,
        }
    }

    /// Run a scripted server that answers each request in order, echoing IDs
    fn scripted_server(responses: Vec<ServerMessage>) -> (TestSession, JoinHandle<()>) {
        let (client_stream, server_stream) = tokio::io::duplex(64 * 1024);
        let (client_read, client_write) = tokio::io::split(client_stream);
        let (server_read, server_write) = tokio::io::split(server_stream);

        let handle = tokio::spawn(async move {
            let mut reader = FrameReader::new(BufReader::new(server_read));
            let mut writer = FrameWriter::new(server_write);
            for response in responses {
                let received = read_client_message(&mut reader)
                    .await
                    .expect("Failed to read request")
                    .expect("Client disconnected early");
                send_server_message_with_id(&mut writer, &response, received.message_id)
                    .await
                    .expect("Failed to send response");
            }
        });

        let connection =
            ServerConnection::from_parts(client_read, client_write, Duration::from_secs(5));
        (FileBrowserSession::new(connection), handle)
    }

    #[tokio::test]
    async fn test_login_lists_root() {
        let (mut session, server) = scripted_server(vec![
            login_ok(),
            list_ok("/", vec![dir_entry("documents")]),
        ]);

        let expires_in = session.login("alice", "password123").await.unwrap();
        assert_eq!(expires_in, Some(3600));
        assert!(session.is_logged_in());
        assert_eq!(session.current_path(), "/");
        assert_eq!(session.entries().len(), 1);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_open_and_back() {
        let (mut session, server) = scripted_server(vec![
            login_ok(),
            list_ok("/", vec![dir_entry("documents")]),
            list_ok("/documents", vec![]),
            list_ok("/", vec![dir_entry("documents")]),
        ]);

        session.login("alice", "password123").await.unwrap();
        session.open("documents").await.unwrap();
        assert_eq!(session.current_path(), "/documents");
        assert!(session.can_go_back());

        session.back().await.unwrap();
        assert_eq!(session.current_path(), "/");
        assert!(session.can_go_forward());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_open_leaves_history_unchanged() {
        let (mut session, server) = scripted_server(vec![
            login_ok(),
            list_ok("/", vec![]),
            list_not_found(),
        ]);

        session.login("alice", "password123").await.unwrap();
        let err = session.open("ghost").await.unwrap_err();
        assert!(matches!(err, SessionError::Server(_)));

        // Still at the root, nothing to go back to
        assert_eq!(session.current_path(), "/");
        assert!(!session.can_go_back());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_up_from_root_stays_at_root() {
        let (mut session, server) = scripted_server(vec![
            login_ok(),
            list_ok("/", vec![]),
            list_ok("/", vec![]),
        ]);

        session.login("alice", "password123").await.unwrap();
        session.up().await.unwrap();
        assert_eq!(session.current_path(), "/");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_write_refreshes_listing() {
        let (mut session, server) = scripted_server(vec![
            login_ok(),
            list_ok("/", vec![]),
            ServerMessage::FileWriteResponse {
                success: true,
                error: None,
            },
            list_ok(
                "/",
                vec![FileEntry {
                    name: "notes.txt".to_string(),
                    kind: EntryKind::File,
                    size: Some(5),
                }],
            ),
        ]);

        session.login("alice", "password123").await.unwrap();
        session.write_file("notes.txt", "hello").await.unwrap();
        assert_eq!(session.entries().len(), 1);
        assert_eq!(session.entries()[0].name, "notes.txt");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_operations_require_login() {
        let (client_stream, _server_stream) = tokio::io::duplex(1024);
        let (client_read, client_write) = tokio::io::split(client_stream);
        let connection =
            ServerConnection::from_parts(client_read, client_write, Duration::from_secs(1));
        let mut session: TestSession = FileBrowserSession::new(connection);

        let err = session.refresh().await.unwrap_err();
        assert!(matches!(err, SessionError::NotLoggedIn));

        let err = session.read_file("notes.txt").await.unwrap_err();
        assert!(matches!(err, SessionError::NotLoggedIn));
    }
}
