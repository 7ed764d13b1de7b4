//! Configuration management with file persistence

use anyhow::{Context, anyhow};
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Saved search file name inside the data directory
pub const SAVED_SEARCHES_FILE: &str = "saved_searches.json";

const MAX_PAGE_SIZE: usize = 1000;

/// Findex configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Overrides `<data dir>/saved_searches.json`
    pub saved_queries_path: Option<PathBuf>,
    /// Corpus used when `--corpus` is not given
    pub corpus_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub page_size: usize,
    /// strftime pattern for dates in text output
    pub date_format: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: 50,
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("FINDEX_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("findex")
        };
        Ok(dir)
    }

    /// Get the data directory path (saved searches live here)
    pub fn data_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("FINDEX_DATA_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::data_dir()
                .ok_or_else(|| anyhow!("Could not determine data directory"))?
                .join("findex")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Resolved saved search file path
    pub fn saved_queries_path(&self) -> anyhow::Result<PathBuf> {
        match &self.storage.saved_queries_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::data_dir()?.join(SAVED_SEARCHES_FILE)),
        }
    }

    /// Load configuration from file, or use defaults if it doesn't exist
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> anyhow::Result<()> {
        self.validate()?;

        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let path = Self::config_path()?;
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(1..=MAX_PAGE_SIZE).contains(&self.display.page_size) {
            return Err(anyhow!(
                "display.page_size must be between 1 and {}",
                MAX_PAGE_SIZE
            ));
        }
        if self.display.date_format.is_empty()
            || StrftimeItems::new(&self.display.date_format).any(|item| matches!(item, Item::Error))
        {
            return Err(anyhow!(
                "display.date_format '{}' is not a valid strftime pattern",
                self.display.date_format
            ));
        }
        Ok(())
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        let show_path = |path: &Option<PathBuf>| {
            path.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(not set)".to_string())
        };

        match key {
            "storage.saved_queries_path" => Ok(self
                .storage
                .saved_queries_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| {
                    self.saved_queries_path()
                        .map(|p| format!("(default: {})", p.display()))
                        .unwrap_or_else(|_| "(not set)".to_string())
                })),
            "storage.corpus_path" => Ok(show_path(&self.storage.corpus_path)),
            "display.page_size" => Ok(self.display.page_size.to_string()),
            "display.date_format" => Ok(self.display.date_format.clone()),
            _ => Err(unknown_key(key)),
        }
    }

    /// Set a configuration value by key; an empty path clears it
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let as_path = |value: &str| {
            let value = value.trim();
            (!value.is_empty()).then(|| PathBuf::from(value))
        };

        match key {
            "storage.saved_queries_path" => {
                self.storage.saved_queries_path = as_path(value);
            }
            "storage.corpus_path" => {
                self.storage.corpus_path = as_path(value);
            }
            "display.page_size" => {
                let size: usize = value
                    .parse()
                    .with_context(|| format!("Invalid page_size value: {}", value))?;
                if !(1..=MAX_PAGE_SIZE).contains(&size) {
                    return Err(anyhow!("Page size must be between 1 and {}", MAX_PAGE_SIZE));
                }
                self.display.page_size = size;
            }
            "display.date_format" => {
                let previous = std::mem::replace(&mut self.display.date_format, value.to_string());
                if let Err(e) = self.validate() {
                    self.display.date_format = previous;
                    return Err(e);
                }
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    /// List all configuration keys and their values
    pub fn list(&self) -> anyhow::Result<Vec<(String, String)>> {
        Self::keys()
            .iter()
            .map(|key| -> anyhow::Result<(String, String)> {
                Ok((key.to_string(), self.get(key)?))
            })
            .collect()
    }

    /// Every settable key
    pub fn keys() -> &'static [&'static str] {
        &[
            "storage.saved_queries_path",
            "storage.corpus_path",
            "display.page_size",
            "display.date_format",
        ]
    }

    /// Reset configuration to defaults
    pub fn reset() -> anyhow::Result<()> {
        let path = Self::config_path()?;
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove config file: {}", path.display()))?;
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> anyhow::Error {
    anyhow!(
        "Unknown configuration key: {}. Valid keys: {}",
        key,
        Config::keys().join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert!(config.storage.saved_queries_path.is_none());
        assert!(config.storage.corpus_path.is_none());
        assert_eq!(config.display.page_size, 50);
        assert_eq!(config.display.date_format, "%Y-%m-%d");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_set_and_get() {
        let mut config = Config::default();

        config.set("display.page_size", "20").unwrap();
        config.set("storage.corpus_path", "/tmp/corpus.jsonl").unwrap();

        assert_eq!(config.get("display.page_size").unwrap(), "20");
        assert_eq!(config.get("storage.corpus_path").unwrap(), "/tmp/corpus.jsonl");

        config.set("storage.corpus_path", "").unwrap();
        assert_eq!(config.get("storage.corpus_path").unwrap(), "(not set)");
    }

    #[test]
    fn test_set_rejects_invalid_values() {
        let mut config = Config::default();

        assert!(config.set("display.page_size", "0").is_err());
        assert!(config.set("display.page_size", "lots").is_err());
        assert!(config.set("display.date_format", "%Q").is_err());
        assert_eq!(config.display.date_format, "%Y-%m-%d");
        assert!(config.set("search.fuzzy", "true").is_err());
    }

    #[test]
    fn test_unknown_key_lists_valid_keys() {
        let err = Config::default().get("nope").unwrap_err().to_string();
        assert!(err.contains("display.page_size"));
    }

    #[test]
    fn test_explicit_saved_queries_path_wins() {
        let mut config = Config::default();
        config.set("storage.saved_queries_path", "/data/saved.json").unwrap();

        assert_eq!(
            config.saved_queries_path().unwrap(),
            PathBuf::from("/data/saved.json")
        );
    }

    #[test]
    fn test_toml_round_trip_with_partial_file() {
        let config: Config = toml::from_str("[display]\npage_size = 10\n").unwrap();

        assert_eq!(config.display.page_size, 10);
        assert_eq!(config.display.date_format, "%Y-%m-%d");
        assert!(config.storage.corpus_path.is_none());

        let rendered = toml::to_string_pretty(&config).unwrap();
        let reparsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(reparsed, config);
    }

    #[test]
    fn test_list_covers_every_key() {
        let listed = Config::default().list().unwrap();
        assert_eq!(listed.len(), Config::keys().len());
    }
}
