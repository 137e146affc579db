use crate::error::{Result, ViewerError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Where the manifest and subtitle files are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Http,
    Directory,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Http => write!(f, "http"),
            SourceKind::Directory => write!(f, "directory"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL (`http://`, `https://`) or local directory holding `manifest.json`
    /// and the `videos/` tree.
    pub source: String,
    pub manifest_path: String,
    pub poll_interval_ms: u64,
    pub scroll_lock_ms: u64,
    pub page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: "translation".to_string(),
            manifest_path: "manifest.json".to_string(),
            poll_interval_ms: 100,
            scroll_lock_ms: 50,
            page_size: 12,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Load from config file if it exists
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)?;
                match toml::from_str::<Config>(&contents) {
                    Ok(file_config) => config = file_config,
                    Err(e) => tracing::warn!(
                        "Ignoring malformed config file {}: {}",
                        config_path.display(),
                        e
                    ),
                }
            }
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.source.trim().is_empty() {
            return Err(ViewerError::Config("source must not be empty".to_string()));
        }

        if self.manifest_path.trim().is_empty() {
            return Err(ViewerError::Config(
                "manifest_path must not be empty".to_string(),
            ));
        }

        if self.poll_interval_ms == 0 {
            return Err(ViewerError::Config(
                "poll_interval_ms must be greater than 0".to_string(),
            ));
        }

        if self.scroll_lock_ms == 0 {
            return Err(ViewerError::Config(
                "scroll_lock_ms must be greater than 0".to_string(),
            ));
        }

        if self.page_size == 0 {
            return Err(ViewerError::Config(
                "page_size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn source_kind(&self) -> SourceKind {
        let lower = self.source.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            SourceKind::Http
        } else {
            SourceKind::Directory
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn scroll_lock(&self) -> Duration {
        Duration::from_millis(self.scroll_lock_ms)
    }

    pub fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("subview").join("config.toml"))
    }
}
