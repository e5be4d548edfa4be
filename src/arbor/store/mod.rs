//! # Storage Layer
//!
//! The engine never touches the filesystem itself. It hands out serialized
//! JSON and takes raw text back; the [`DocumentStore`] trait is the seam where
//! those strings meet actual storage.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: reads and writes real files, creating parent
//!   directories on write. Paths given without an extension get the configured
//!   one (`.tree` by default).
//! - [`memory::InMemoryStore`]: a path-to-contents map for tests.
//!
//! ## File Extensions
//!
//! `.tree` and `.json` hold the same payload and load identically. Anything
//! else is still attempted, with a warning.

use crate::error::Result;
use std::path::{Path, PathBuf};

pub mod fs;
pub mod memory;

pub const KNOWN_EXTENSIONS: [&str; 2] = ["tree", "json"];

/// Abstract interface for document storage.
pub trait DocumentStore {
    /// Raw contents of the document at `path`.
    fn read(&self, path: &Path) -> Result<String>;

    /// Replace the document at `path` with `contents`.
    fn write(&mut self, path: &Path, contents: &str) -> Result<()>;

    fn exists(&self, path: &Path) -> bool;

    /// The path a document is actually stored under. Defaults to `path` as given.
    fn resolve(&self, path: &Path) -> PathBuf {
        path.to_path_buf()
    }
}

/// True for the extensions the persisted format is known under.
pub fn is_known_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| KNOWN_EXTENSIONS.iter().any(|k| k.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions() {
        assert!(is_known_extension(Path::new("notes.tree")));
        assert!(is_known_extension(Path::new("dir/notes.JSON")));
        assert!(!is_known_extension(Path::new("notes.md")));
        assert!(!is_known_extension(Path::new("notes")));
    }
}
