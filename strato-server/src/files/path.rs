//! Safe path resolution for file storage operations
//!
//! Provides secure path resolution that prevents directory traversal attacks.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Error type for path resolution failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// Path contains invalid components (e.g., `..`, absolute paths)
    InvalidPath,
    /// Path escapes the allowed root directory
    AccessDenied,
    /// Path does not exist on the filesystem
    NotFound,
    /// Failed to canonicalize the path
    CanonicalizeFailed(String),
    /// The area root is not an absolute/canonical path
    InvalidAreaRoot,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPath => write!(f, "invalid path"),
            Self::AccessDenied => write!(f, "access denied"),
            Self::NotFound => write!(f, "not found"),
            Self::CanonicalizeFailed(e) => write!(f, "failed to canonicalize path: {}", e),
            Self::InvalidAreaRoot => write!(f, "area root is not absolute"),
        }
    }
}

impl std::error::Error for PathError {}

/// Safely resolve a relative path within an area root directory
///
/// This function provides three layers of defense against directory traversal:
///
/// 1. **Component validation**: Rejects `..`, absolute paths, and Windows drive prefixes
/// 2. **Canonicalization**: Resolves symlinks to detect escape attempts
/// 3. **Prefix check**: Verifies the final path is under the allowed root
///
/// # Arguments
///
/// * `area_root` - The root directory for the user's storage. This **must** be an
///   absolute, canonical path (e.g., from `fs::canonicalize()`). The function will
///   return `InvalidAreaRoot` if this is not absolute.
/// * `relative_path` - The user-provided relative path to resolve
///
/// # Security
///
/// The caller is responsible for ensuring `area_root` is canonical. While this
/// function checks that it's absolute, it cannot verify canonicalization (e.g.,
/// that symlinks are resolved). Always obtain `area_root` from `fs::canonicalize()`.
#[must_use = "path resolution result should be used"]
pub fn resolve_path(area_root: &Path, relative_path: &str) -> Result<PathBuf, PathError> {
    // Verify area_root is absolute (we can't verify it's canonical, but absolute is required)
    if !area_root.is_absolute() {
        return Err(PathError::InvalidAreaRoot);
    }

    // Layer 1: Validate path components before touching filesystem
    validate_path_components(relative_path)?;

    // Construct the candidate path
    let candidate = area_root.join(relative_path);

    // Layer 2: Canonicalize to resolve symlinks and get absolute path
    let canonical = candidate.canonicalize().map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            PathError::NotFound
        } else {
            PathError::CanonicalizeFailed(e.to_string())
        }
    })?;

    // Layer 3: Verify the canonical path is still under the area root
    if !canonical.starts_with(area_root) {
        return Err(PathError::AccessDenied);
    }

    Ok(canonical)
}

/// Validate path components without touching the filesystem
///
/// Rejects paths containing:
/// - Parent directory references (`..`)
/// - Absolute path indicators (leading `/`, `\`, or Windows drive letters)
///
/// Allows:
/// - Empty paths (refers to root itself)
/// - Normal path components
/// - Current directory (`.`)
fn validate_path_components(path: &str) -> Result<(), PathError> {
    // Empty path is valid (refers to the root itself)
    if path.is_empty() {
        return Ok(());
    }

    let path_ref = Path::new(path);

    for component in path_ref.components() {
        match component {
            // Normal path segment - allowed
            Component::Normal(_) => {}
            // Current directory (.) - allowed (harmless)
            Component::CurDir => {}
            // Parent directory (..) - REJECTED
            Component::ParentDir => return Err(PathError::InvalidPath),
            // Root directory (/) - REJECTED (absolute path)
            Component::RootDir => return Err(PathError::InvalidPath),
            // Windows prefix (C:, \\server) - REJECTED
            Component::Prefix(_) => return Err(PathError::InvalidPath),
        }
    }

    Ok(())
}

/// Resolve a path for a new file/directory that doesn't exist yet
///
/// Similar to `resolve_path` but handles the case where the final component
/// doesn't exist. Validates the parent directory exists and is under the area root.
///
/// # Arguments
///
/// * `area_root` - The root directory for the user's storage. This **must** be an
///   absolute, canonical path (e.g., from `fs::canonicalize()`).
/// * `relative_path` - The user-provided relative path to the new item. Must not be empty.
///
/// # Returns
///
/// Returns the path where the new item should be created if valid.
/// The returned path is NOT canonicalized (since the file doesn't exist),
/// but the parent directory is verified to exist and be under the area root.
///
/// # Errors
///
/// Returns `InvalidPath` if `relative_path` is empty (can't create nameless files).
#[must_use = "path resolution result should be used"]
pub fn resolve_new_path(area_root: &Path, relative_path: &str) -> Result<PathBuf, PathError> {
    // Verify area_root is absolute
    if !area_root.is_absolute() {
        return Err(PathError::InvalidAreaRoot);
    }

    // Empty path is invalid for new files - you need a filename
    if relative_path.is_empty() {
        return Err(PathError::InvalidPath);
    }

    // Layer 1: Validate path components
    validate_path_components(relative_path)?;

    let candidate = area_root.join(relative_path);

    // Get the parent directory
    let parent = candidate.parent().ok_or(PathError::InvalidPath)?;

    // If the parent is the area_root itself, just verify and return
    if parent == area_root {
        return Ok(candidate);
    }

    // Canonicalize the parent to verify it exists and is under the root
    let canonical_parent = parent.canonicalize().map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            PathError::NotFound
        } else {
            PathError::CanonicalizeFailed(e.to_string())
        }
    })?;

    if !canonical_parent.starts_with(area_root) {
        return Err(PathError::AccessDenied);
    }

    // Return the non-canonicalized path (file doesn't exist yet)
    // Join the canonical parent with the filename
    let filename = candidate.file_name().ok_or(PathError::InvalidPath)?;

    Ok(canonical_parent.join(filename))
}
