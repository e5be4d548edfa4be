use crate::api::ArborApi;
use crate::config::ArborConfig;
use crate::error::{ArborError, Result};
use crate::store::fs::FileStore;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the config directory.
pub const HOME_ENV: &str = "ARBOR_HOME";

pub struct ArborContext {
    pub api: ArborApi<FileStore>,
    pub config_dir: PathBuf,
}

/// Where config.json lives: `$ARBOR_HOME` when set and non-empty, otherwise
/// the platform config directory.
pub fn config_dir() -> Result<PathBuf> {
    config_dir_from(std::env::var_os(HOME_ENV).map(PathBuf::from))
}

fn config_dir_from(override_dir: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = override_dir.filter(|d| !d.as_os_str().is_empty()) {
        return Ok(dir);
    }
    ProjectDirs::from("com", "arbor", "arbor")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| ArborError::Api("Could not determine config dir".to_string()))
}

/// Load the config from `config_dir` and build a file-backed API with it.
///
/// A config file that fails to parse falls back to defaults with a warning,
/// so a bad setting never locks the user out of their documents.
pub fn initialize(config_dir: &Path) -> ArborContext {
    let config = ArborConfig::load(config_dir).unwrap_or_else(|e| {
        tracing::warn!(error = %e, dir = %config_dir.display(), "ignoring unreadable config");
        ArborConfig::default()
    });
    let store = FileStore::new().with_file_ext(&config.file_ext);
    tracing::debug!(dir = %config_dir.display(), ext = %config.file_ext, "initialized");

    ArborContext {
        api: ArborApi::new(store, config),
        config_dir: config_dir.to_path_buf(),
    }
}
