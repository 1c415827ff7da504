//! Configuration management for organizer
//!
//! Handles the ~/.organizer/ directory structure and config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::schema::EntityKind;

/// Overrides the organizer home directory
pub const HOME_ENV: &str = "ORGANIZER_HOME";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the collection files; defaults to `<home>/data`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Label printed next to balances
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "RUB".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            currency: default_currency(),
        }
    }
}

/// Returns the path to the organizer home directory (~/.organizer)
pub fn organizer_home() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(home));
    }
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".organizer"))
}

/// Returns paths to all organizer directories
#[derive(Debug, Clone)]
pub struct OrganizerPaths {
    pub root: PathBuf,
    pub config: PathBuf,
    pub data: PathBuf,
}

impl OrganizerPaths {
    pub fn new() -> Result<Self> {
        Ok(Self::at(organizer_home()?))
    }

    /// Layout rooted at an explicit directory
    pub fn at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            config: root.join("config.toml"),
            data: root.join("data"),
            root,
        }
    }

    /// Resolve paths, honoring a `data_dir` override from config.toml
    pub fn resolve() -> Result<(Self, Config)> {
        let mut paths = Self::new()?;
        let config = load_config(&paths)?;
        if let Some(dir) = &config.data_dir {
            paths.data = dir.clone();
        }
        Ok((paths, config))
    }

    /// Create all directories if they don't exist
    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.root).context("Failed to create organizer root")?;
        fs::create_dir_all(&self.data).context("Failed to create data directory")?;
        Ok(())
    }

    /// Check if organizer has been initialized
    pub fn is_initialized(&self) -> bool {
        self.config.exists()
    }

    /// Backing JSON document for a record kind
    pub fn collection_file(&self, kind: EntityKind) -> PathBuf {
        self.data.join(kind.file_name())
    }
}

/// Load configuration from disk, falling back to defaults
pub fn load_config(paths: &OrganizerPaths) -> Result<Config> {
    if !paths.config.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(&paths.config).context("Failed to read config.toml")?;
    toml::from_str(&content).context("Failed to parse config.toml")
}

/// Save configuration to disk
pub fn save_config(paths: &OrganizerPaths, config: &Config) -> Result<()> {
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(&paths.config, content).context("Failed to write config.toml")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let paths = OrganizerPaths::at(dir.path());
        let config = load_config(&paths).unwrap();
        assert_eq!(config.currency, "RUB");
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let dir = TempDir::new().unwrap();
        let paths = OrganizerPaths::at(dir.path());
        let config = Config {
            data_dir: Some(dir.path().join("elsewhere")),
            currency: "EUR".to_string(),
        };
        save_config(&paths, &config).unwrap();

        let loaded = load_config(&paths).unwrap();
        assert_eq!(loaded.currency, "EUR");
        assert_eq!(loaded.data_dir, Some(dir.path().join("elsewhere")));
    }

    #[test]
    fn test_collection_files_live_in_data_dir() {
        let paths = OrganizerPaths::at("/tmp/org");
        assert_eq!(
            paths.collection_file(EntityKind::Task),
            PathBuf::from("/tmp/org/data/tasks.json")
        );
    }
}
