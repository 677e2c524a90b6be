//! Browser-style navigation history over virtual paths
//!
//! The history is a list of visited directories with a cursor. Navigating
//! somewhere new truncates everything ahead of the cursor, exactly like a web
//! browser's back/forward stack.

/// Navigation history; always contains at least the root entry
#[derive(Debug, Clone)]
pub struct NavigationHistory {
    entries: Vec<String>,
    cursor: usize,
}

impl NavigationHistory {
    /// Start at the root directory
    pub fn new() -> Self {
        Self {
            entries: vec!["/".to_string()],
            cursor: 0,
        }
    }

    /// The directory the cursor points at
    pub fn current(&self) -> &str {
        &self.entries[self.cursor]
    }

    /// Record a navigation to `path`
    ///
    /// Drops any forward entries. A repeat visit to the current directory is
    /// still recorded, so going back returns to it once per visit.
    pub fn navigate_to(&mut self, path: impl Into<String>) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(path.into());
        self.cursor += 1;
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// The directory `back` would land on, without moving
    pub fn back_target(&self) -> Option<&str> {
        self.cursor
            .checked_sub(1)
            .map(|i| self.entries[i].as_str())
    }

    /// The directory `forward` would land on, without moving
    pub fn forward_target(&self) -> Option<&str> {
        self.entries.get(self.cursor + 1).map(String::as_str)
    }

    /// Move back one entry
    pub fn back(&mut self) -> Option<&str> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    /// Move forward one entry
    pub fn forward(&mut self) -> Option<&str> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }
}

impl Default for NavigationHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// The parent of a virtual path; the root is its own parent
pub fn parent_path(path: &str) -> String {
    match path.trim_end_matches('/').rfind('/') {
        // "/a" -> "/", "/a/b" -> "/a"
        Some(0) | None => "/".to_string(),
        Some(idx) => path[..idx].to_string(),
    }
}

/// Join user input onto the current directory
///
/// Absolute input is used as-is; relative input is appended to `base`.
pub fn join_virtual(base: &str, input: &str) -> String {
    if input.starts_with('/') {
        input.to_string()
    } else if base == "/" {
        format!("/{}", input)
    } else {
        format!("{}/{}", base, input)
    }
}
