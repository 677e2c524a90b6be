//! Command-line argument parsing

use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;
use strato_common::{DEFAULT_PORT, DEFAULT_SESSION_TTL_SECS};

/// Get default database path help text for current platform
fn default_database_help() -> String {
    #[cfg(target_os = "linux")]
    return "Database file path (default: ~/.local/share/stratod/strato.db)".to_string();

    #[cfg(target_os = "macos")]
    return "Database file path (default: ~/Library/Application Support/stratod/strato.db)"
        .to_string();

    #[cfg(target_os = "windows")]
    return "Database file path (default: %APPDATA%\\stratod\\strato.db)".to_string();

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    return "Database file path (overrides platform default)".to_string();
}

/// Get default file root help text for current platform
fn default_file_root_help() -> String {
    #[cfg(target_os = "linux")]
    return "File storage root directory (default: ~/.local/share/stratod/files/)".to_string();

    #[cfg(target_os = "macos")]
    return "File storage root directory (default: ~/Library/Application Support/stratod/files/)"
        .to_string();

    #[cfg(target_os = "windows")]
    return "File storage root directory (default: %APPDATA%\\stratod\\files\\)".to_string();

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    return "File storage root directory (overrides platform default)".to_string();
}

/// Strato File Server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// IP address to bind to (IPv4 or IPv6)
    #[arg(short, long, default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Database file path (overrides platform default)
    #[arg(short, long, help = default_database_help())]
    pub database: Option<PathBuf>,

    /// File storage root directory (overrides platform default)
    #[arg(short = 'f', long = "file-root", help = default_file_root_help())]
    pub file_root: Option<PathBuf>,

    /// Bearer token lifetime in seconds
    #[arg(long = "session-ttl", default_value_t = DEFAULT_SESSION_TTL_SECS)]
    pub session_ttl: u64,

    /// Enable debug logging (shows connect/disconnect and request details)
    #[arg(long, default_value = "false")]
    pub debug: bool,
}
