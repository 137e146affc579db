pub mod file;
pub mod http;

pub use file::DirectoryFetcher;
pub use http::HttpFetcher;

use crate::config::{Config, SourceKind};
use crate::error::Result;
use crate::manifest::Manifest;
use async_trait::async_trait;
use tracing::info;

/// Retrieves manifest and subtitle text by path relative to a source root.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch a document, failing on transport errors or non-success status.
    async fn fetch_text(&self, path: &str) -> Result<String>;
    fn name(&self) -> &'static str;
}

pub fn create_fetcher(config: &Config) -> Result<Box<dyn Fetcher>> {
    match config.source_kind() {
        SourceKind::Http => Ok(Box::new(HttpFetcher::new(&config.source)?)),
        SourceKind::Directory => Ok(Box::new(DirectoryFetcher::new(&config.source))),
    }
}

pub async fn fetch_manifest(fetcher: &dyn Fetcher, path: &str) -> Result<Manifest> {
    let text = fetcher.fetch_text(path).await?;
    let manifest = Manifest::from_json(&text)?;
    info!(
        "Loaded manifest {} via {}: {} videos",
        path,
        fetcher.name(),
        manifest.videos.len()
    );
    Ok(manifest)
}
