//! stratod - personal cloud file server

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use strato_server::args::Args;
use strato_server::connection::{ConnectionParams, handle_connection};
use strato_server::constants::{
    ERR_ACCEPT, ERR_BIND, ERR_CONNECTION, ERR_DATABASE_INIT, ERR_FILE_ROOT_CANONICALIZE,
    ERR_GENERIC, ERR_SET_PERMISSIONS, ERR_SIGNAL_SIGTERM, MSG_BANNER, MSG_DATABASE, MSG_FILE_ROOT,
    MSG_LISTENING, MSG_SHUTDOWN_RECEIVED,
};
use strato_server::db::{Database, default_database_path, init_db};
use strato_server::sessions::SessionManager;

#[tokio::main]
async fn main() -> ExitCode {
    println!("{}{}", MSG_BANNER, env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}{}", ERR_GENERIC, e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> io::Result<()> {
    let db = setup_db(args.database.clone()).await?;
    let file_root = setup_file_area(args.file_root.clone())?;
    let sessions = SessionManager::new(Duration::from_secs(args.session_ttl));

    let bind_addr = format!("{}:{}", args.bind, args.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| io::Error::other(format!("{}{}: {}", ERR_BIND, bind_addr, e)))?;
    println!("{}{}", MSG_LISTENING, bind_addr);

    tokio::select! {
        result = accept_loop(listener, db, sessions, file_root, args.debug) => result,
        result = shutdown_signal() => {
            result?;
            println!("{}", MSG_SHUTDOWN_RECEIVED);
            Ok(())
        }
    }
}

async fn accept_loop(
    listener: TcpListener,
    db: Database,
    sessions: SessionManager,
    file_root: &'static Path,
    debug: bool,
) -> io::Result<()> {
    loop {
        let (stream, peer_addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                eprintln!("{}{}", ERR_ACCEPT, e);
                continue;
            }
        };

        if debug {
            println!("Connection from {}", peer_addr);
        }

        let params = ConnectionParams {
            peer_addr,
            db: db.clone(),
            sessions: sessions.clone(),
            file_root,
            debug,
        };

        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, params).await {
                eprintln!("{}{}: {}", ERR_CONNECTION, peer_addr, e);
            }
        });
    }
}

/// Open (creating if needed) the user database
async fn setup_db(database: Option<PathBuf>) -> io::Result<Database> {
    let path = match database {
        Some(path) => path,
        None => default_database_path()?,
    };

    let pool = init_db(&path)
        .await
        .map_err(|e| io::Error::other(format!("{}{}", ERR_DATABASE_INIT, e)))?;
    let db = Database::new(pool);

    // The database holds password hashes; keep it owner-only
    #[cfg(unix)]
    {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        if let Ok(metadata) = fs::metadata(&path) {
            let mut permissions = metadata.permissions();
            permissions.set_mode(0o600);
            if let Err(e) = fs::set_permissions(&path, permissions) {
                eprintln!("{}{}", ERR_SET_PERMISSIONS, e);
            }
        }
    }

    println!("{}{}", MSG_DATABASE, path.display());
    Ok(db)
}

/// Prepare the file storage root and leak it for the lifetime of the process
fn setup_file_area(file_root: Option<PathBuf>) -> io::Result<&'static Path> {
    let root = match file_root {
        Some(root) => root,
        None => dirs::data_dir()
            .ok_or_else(|| io::Error::other("could not determine data directory"))?
            .join("stratod")
            .join("files"),
    };

    std::fs::create_dir_all(root.join("users"))?;

    let canonical = root
        .canonicalize()
        .map_err(|e| io::Error::other(format!("{}{}", ERR_FILE_ROOT_CANONICALIZE, e)))?;
    println!("{}{}", MSG_FILE_ROOT, canonical.display());

    Ok(Box::leak(canonical.into_boxed_path()))
}

/// Wait for SIGINT, and on unix also SIGTERM
async fn shutdown_signal() -> io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = signal(SignalKind::terminate())
            .map_err(|e| io::Error::other(format!("{}: {}", ERR_SIGNAL_SIGTERM, e)))?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result,
            _ = sigterm.recv() => Ok(()),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await
    }
}
