//! Filesystem layer for per-user file storage

pub mod operations;
pub mod path;

pub use operations::{ensure_user_area, list_directory, remove_path, user_area, virtual_to_relative};
pub use path::{PathError, resolve_new_path, resolve_path};
