//! Filesystem operations on resolved paths
//!
//! Everything here works on paths that already passed `resolve_path` or
//! `resolve_new_path`. Virtual client paths (always `/`-rooted) are converted
//! with `virtual_to_relative` before resolution.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use strato_common::protocol::{EntryKind, FileEntry};

/// Convert a virtual path from the wire (`/documents/notes.txt`) into a
/// relative path suitable for `resolve_path`
///
/// Leading slashes are stripped; `"/"` maps to the empty path (the user root).
#[must_use]
pub fn virtual_to_relative(path: &str) -> &str {
    path.trim_start_matches('/')
}

/// The storage root for a single user
#[must_use]
pub fn user_area(file_root: &Path, username: &str) -> PathBuf {
    file_root.join("users").join(username)
}

/// Create a user's storage directory if missing and return its canonical path
///
/// # Errors
///
/// Returns an error if the directory cannot be created or canonicalized.
pub fn ensure_user_area(file_root: &Path, username: &str) -> io::Result<PathBuf> {
    let area = user_area(file_root, username);
    fs::create_dir_all(&area)?;
    area.canonicalize()
}

/// List the entries of a directory, sorted directories-first then by name
/// (case-insensitive)
///
/// Entries whose names are not valid UTF-8 are skipped; they cannot be
/// represented on the wire. Symlinks are reported as their targets.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn list_directory(dir: &Path) -> io::Result<Vec<FileEntry>> {
    let mut entries = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;

        let Some(name) = entry.file_name().to_str().map(String::from) else {
            continue;
        };

        // Follow symlinks so a link to a directory lists as a directory
        let metadata = match entry.path().metadata() {
            Ok(m) => m,
            // Broken symlink or racing delete - skip
            Err(_) => continue,
        };

        if metadata.is_dir() {
            entries.push(FileEntry {
                name,
                kind: EntryKind::Directory,
                size: None,
            });
        } else {
            entries.push(FileEntry {
                name,
                kind: EntryKind::File,
                size: Some(metadata.len()),
            });
        }
    }

    entries.sort_by(|a, b| {
        let a_dir = a.kind == EntryKind::Directory;
        let b_dir = b.kind == EntryKind::Directory;
        b_dir
            .cmp(&a_dir)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });

    Ok(entries)
}

/// Remove a file or directory
///
/// Directories are only removed recursively when `recursive` is set; a
/// non-empty directory otherwise fails with the underlying io error.
/// Symlinks are removed as links, never following them.
///
/// # Errors
///
/// Returns an error if the path does not exist or removal fails.
pub fn remove_path(path: &Path, recursive: bool) -> io::Result<()> {
    // symlink_metadata so a symlink to a directory is deleted as a link
    let metadata = fs::symlink_metadata(path)?;

    if metadata.is_dir() {
        if recursive {
            fs::remove_dir_all(path)
        } else {
            fs::remove_dir(path)
        }
    } else {
        fs::remove_file(path)
    }
}
