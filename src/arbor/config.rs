use crate::error::{ArborError, Result};
use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::search::SearchScope;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_FILE_EXT: &str = ".tree";
const DEFAULT_PLACEHOLDER: &str = "(empty)";
const DEFAULT_BREADCRUMB_WIDTH: usize = 30;

/// Keys accepted by [`ArborConfig::get`] and [`ArborConfig::set`], in display order.
pub const KEYS: [&str; 5] = [
    "file_ext",
    "history_limit",
    "empty_placeholder",
    "breadcrumb_width",
    "search_hidden",
];

/// Configuration for arbor, stored as config.json in the config directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArborConfig {
    /// Extension added to document paths given without one
    #[serde(default = "default_file_ext")]
    pub file_ext: String,

    /// Undo steps kept per document
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Shown in exports and breadcrumbs for nodes with no text
    #[serde(default = "default_placeholder")]
    pub empty_placeholder: String,

    /// Characters per breadcrumb entry before it is cut
    #[serde(default = "default_breadcrumb_width")]
    pub breadcrumb_width: usize,

    /// Search inside collapsed subtrees too
    #[serde(default)]
    pub search_hidden: bool,
}

fn default_file_ext() -> String {
    DEFAULT_FILE_EXT.to_string()
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_placeholder() -> String {
    DEFAULT_PLACEHOLDER.to_string()
}

fn default_breadcrumb_width() -> usize {
    DEFAULT_BREADCRUMB_WIDTH
}

impl Default for ArborConfig {
    fn default() -> Self {
        Self {
            file_ext: default_file_ext(),
            history_limit: default_history_limit(),
            empty_placeholder: default_placeholder(),
            breadcrumb_width: default_breadcrumb_width(),
            search_hidden: false,
        }
    }
}

impl ArborConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(ArborError::Io)?;
        let mut config: ArborConfig =
            serde_json::from_str(&content).map_err(ArborError::Serialization)?;
        config.history_limit = config.history_limit.max(1);
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(ArborError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(ArborError::Serialization)?;
        fs::write(config_path, content).map_err(ArborError::Io)?;
        Ok(())
    }

    /// Set the file extension (normalizes to start with a dot)
    pub fn set_file_ext(&mut self, ext: &str) {
        if ext.starts_with('.') {
            self.file_ext = ext.to_string();
        } else {
            self.file_ext = format!(".{}", ext);
        }
    }

    pub fn search_scope(&self) -> SearchScope {
        if self.search_hidden {
            SearchScope::All
        } else {
            SearchScope::Visible
        }
    }

    pub fn get(&self, key: &str) -> Result<String> {
        let value = match key {
            "file_ext" => self.file_ext.clone(),
            "history_limit" => self.history_limit.to_string(),
            "empty_placeholder" => self.empty_placeholder.clone(),
            "breadcrumb_width" => self.breadcrumb_width.to_string(),
            "search_hidden" => self.search_hidden.to_string(),
            other => return Err(unknown_key(other)),
        };
        Ok(value)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "file_ext" => self.set_file_ext(value),
            "history_limit" => self.history_limit = parse_number(key, value)?.max(1),
            "empty_placeholder" => self.empty_placeholder = value.to_string(),
            "breadcrumb_width" => self.breadcrumb_width = parse_number(key, value)?,
            "search_hidden" => {
                self.search_hidden = value.parse::<bool>().map_err(|_| {
                    ArborError::Api(format!("{} must be true or false, got {}", key, value))
                })?
            }
            other => return Err(unknown_key(other)),
        }
        Ok(())
    }

    /// Every key with its current value.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        KEYS.iter()
            .filter_map(|k| self.get(k).ok().map(|v| (*k, v)))
            .collect()
    }
}

fn parse_number(key: &str, value: &str) -> Result<usize> {
    value
        .parse::<usize>()
        .map_err(|_| ArborError::Api(format!("{} must be a number, got {}", key, value)))
}

fn unknown_key(key: &str) -> ArborError {
    ArborError::Api(format!(
        "Unknown config key: {} (expected one of: {})",
        key,
        KEYS.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = ArborConfig::default();
        assert_eq!(config.file_ext, ".tree");
        assert_eq!(config.history_limit, 100);
        assert_eq!(config.search_scope(), SearchScope::Visible);
    }

    #[test]
    fn test_set_file_ext_without_dot() {
        let mut config = ArborConfig::default();
        config.set_file_ext("json");
        assert_eq!(config.file_ext, ".json");
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempdir().unwrap();
        let config = ArborConfig::load(dir.path().join("nowhere")).unwrap();
        assert_eq!(config, ArborConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let mut config = ArborConfig::default();
        config.set("breadcrumb_width", "12").unwrap();
        config.set("search_hidden", "true").unwrap();
        config.save(dir.path()).unwrap();

        let loaded = ArborConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.breadcrumb_width, 12);
        assert_eq!(loaded.search_scope(), SearchScope::All);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{"history_limit": 0}"#).unwrap();
        let loaded = ArborConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.history_limit, 1);
        assert_eq!(loaded.empty_placeholder, "(empty)");
    }

    #[test]
    fn test_get_and_set_by_key() {
        let mut config = ArborConfig::default();
        assert_eq!(config.get("empty_placeholder").unwrap(), "(empty)");
        assert!(config.set("history_limit", "many").is_err());
        assert!(config.set("colour", "red").is_err());
        assert!(config.get("colour").is_err());
        assert_eq!(config.entries().len(), KEYS.len());
    }
}
