//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File name of the per-directory config
pub const LOCAL_CONFIG_FILE: &str = ".chipdex.yaml";

/// chipdex configuration with layered hierarchy
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog snapshot file or directory
    pub catalog: Option<PathBuf>,

    /// Default output format
    pub default_format: Option<String>,

    /// Default row limit for list output
    pub limit: Option<usize>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Global user config (~/.config/chipdex/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 2. Local config (./.chipdex.yaml)
        if let Some(local) = Self::read_file(Path::new(LOCAL_CONFIG_FILE)) {
            config.merge(local);
        }

        // 3. Environment variables
        config.apply_env(|key| std::env::var(key).ok());

        config
    }

    /// Read one config file; unreadable or malformed files are skipped
    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => {
                tracing::debug!("Loaded config from {}", path.display());
                Some(config)
            }
            Err(e) => {
                tracing::warn!("Ignoring malformed config {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "chipdex")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(catalog) = lookup("CHIPDEX_CATALOG").filter(|v| !v.is_empty()) {
            self.catalog = Some(PathBuf::from(catalog));
        }
        if let Some(format) = lookup("CHIPDEX_FORMAT").filter(|v| !v.is_empty()) {
            self.default_format = Some(format);
        }
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.catalog.is_some() {
            self.catalog = other.catalog;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.limit.is_some() {
            self.limit = other.limit;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_merge_prefers_other() {
        let mut base = Config {
            catalog: Some(PathBuf::from("a.yaml")),
            default_format: Some("tsv".to_string()),
            limit: None,
        };
        base.merge(Config {
            catalog: Some(PathBuf::from("b.yaml")),
            default_format: None,
            limit: Some(20),
        });
        assert_eq!(base.catalog, Some(PathBuf::from("b.yaml")));
        assert_eq!(base.default_format.as_deref(), Some("tsv"));
        assert_eq!(base.limit, Some(20));
    }

    #[test]
    fn test_env_overrides_files() {
        let mut config = Config {
            catalog: Some(PathBuf::from("file.yaml")),
            ..Config::default()
        };
        config.apply_env(|key| match key {
            "CHIPDEX_CATALOG" => Some("/env/catalog".to_string()),
            "CHIPDEX_FORMAT" => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.catalog, Some(PathBuf::from("/env/catalog")));
        assert_eq!(config.default_format, None);
    }

    #[test]
    fn test_read_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "catalog: parts/\nlimit: 5\n").unwrap();
        let config = Config::read_file(&path).unwrap();
        assert_eq!(config.catalog, Some(PathBuf::from("parts/")));
        assert_eq!(config.limit, Some(5));

        std::fs::write(&path, "limit: [oops").unwrap();
        assert!(Config::read_file(&path).is_none());
        assert!(Config::read_file(&dir.path().join("missing.yaml")).is_none());
    }
}
