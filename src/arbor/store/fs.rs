use super::DocumentStore;
use crate::error::{ArborError, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub struct FileStore {
    file_ext: String,
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FileStore {
    pub fn new() -> Self {
        Self {
            file_ext: ".tree".to_string(),
        }
    }

    pub fn with_file_ext(mut self, ext: &str) -> Self {
        if ext.starts_with('.') {
            self.file_ext = ext.to_string();
        } else {
            self.file_ext = format!(".{}", ext);
        }
        self
    }

    pub fn file_ext(&self) -> &str {
        &self.file_ext
    }

    fn ensure_parent(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(ArborError::Io)?;
            }
        }
        Ok(())
    }
}

impl DocumentStore for FileStore {
    fn read(&self, path: &Path) -> Result<String> {
        let path = self.resolve(path);
        fs::read_to_string(&path).map_err(ArborError::Io)
    }

    fn write(&mut self, path: &Path, contents: &str) -> Result<()> {
        let path = self.resolve(path);
        self.ensure_parent(&path)?;
        fs::write(&path, contents).map_err(ArborError::Io)?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).exists()
    }

    /// Append the configured extension when `path` has none.
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.extension().is_some() {
            return path.to_path_buf();
        }
        let mut name = path.as_os_str().to_os_string();
        name.push(&self.file_ext);
        PathBuf::from(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_creates_parent_dirs_and_reads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deeper/outline.tree");
        let mut store = FileStore::new();

        assert!(!store.exists(&path));
        store.write(&path, "{}").unwrap();
        assert!(store.exists(&path));
        assert_eq!(store.read(&path).unwrap(), "{}");
    }

    #[test]
    fn bare_names_get_the_configured_extension() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new().with_file_ext("json");
        assert_eq!(store.file_ext(), ".json");

        store.write(&dir.path().join("plan"), "x").unwrap();
        assert!(dir.path().join("plan.json").exists());
        assert_eq!(store.read(&dir.path().join("plan")).unwrap(), "x");
    }

    #[test]
    fn reading_missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let store = FileStore::new();
        let err = store.read(&dir.path().join("nope.tree")).unwrap_err();
        assert!(matches!(err, ArborError::Io(_)));
    }
}
