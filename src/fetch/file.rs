use crate::error::{Result, ViewerError};
use crate::fetch::Fetcher;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads documents from a local directory tree laid out like the served one.
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl Fetcher for DirectoryFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String> {
        let full = self.root.join(path.trim_start_matches('/'));
        debug!("Reading {}", full.display());

        match tokio::fs::read_to_string(&full).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ViewerError::Status {
                path: path.to_string(),
                status: 404,
            }),
            Err(e) => Err(ViewerError::Io(e)),
        }
    }

    fn name(&self) -> &'static str {
        "directory"
    }
}
