use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result, anyhow};

use crate::passage::DEFAULT_PASSAGE_URL;
use crate::storage::FileStore;
use crate::verse::DEFAULT_VERSE_URL;

pub const VERSE_URL_ENV: &str = "DAILY_VERSE_VERSE_URL";
pub const PASSAGE_URL_ENV: &str = "DAILY_VERSE_PASSAGE_URL";

const DEFAULT_LOG_FILTER: &str = "daily_verse=info";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub verse_url: Option<String>,
    pub passage_url: Option<String>,
    pub storage_path: Option<PathBuf>,
    pub log_filter: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the config file (if any), then applies environment overrides.
    ///
    /// An unreadable or malformed file falls back to defaults; the error is
    /// handed back so it can be logged once logging is set up.
    pub fn load_or_default() -> (Self, Option<anyhow::Error>) {
        match Self::get_config_path() {
            Ok(path) => Self::load_from(&path, env_var),
            Err(e) => {
                let mut config = Self::new();
                config.apply_env_overrides(env_var);
                (config, Some(e))
            }
        }
    }

    fn load_from(
        path: &Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> (Self, Option<anyhow::Error>) {
        let (mut config, error) = match Self::read_file(path) {
            Ok(config) => (config, None),
            Err(e) => (Self::new(), Some(e)),
        };

        config.apply_env_overrides(lookup);
        (config, error)
    }

    fn read_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&config_content)
            .with_context(|| format!("parsing {}", path.display()))
    }

    /// Environment variables win over the file.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(VERSE_URL_ENV).filter(|u| !u.is_empty()) {
            self.verse_url = Some(url);
        }
        if let Some(url) = lookup(PASSAGE_URL_ENV).filter(|u| !u.is_empty()) {
            self.passage_url = Some(url);
        }
    }

    pub fn verse_url(&self) -> &str {
        self.verse_url.as_deref().unwrap_or(DEFAULT_VERSE_URL)
    }

    pub fn passage_url(&self) -> &str {
        self.passage_url.as_deref().unwrap_or(DEFAULT_PASSAGE_URL)
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    pub fn storage_path(&self) -> Result<PathBuf> {
        match &self.storage_path {
            Some(path) => Ok(path.clone()),
            None => FileStore::default_path(),
        }
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow!("Could not determine data directory"))?;

        Ok(data_dir.join("daily-verse").join("daily-verse.log"))
    }

    fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("daily-verse").join("config.json"))
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
