use crate::error::{Result, ViewerError};
use crate::fetch::Fetcher;
use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

/// Fetches documents relative to a base URL.
pub struct HttpFetcher {
    client: Client,
    base: Url,
}

impl HttpFetcher {
    pub fn new(base: &str) -> Result<Self> {
        // A trailing slash keeps the last path segment when joining.
        let base = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{}/", base)
        };
        let base = Url::parse(&base)
            .map_err(|e| ViewerError::Config(format!("Invalid source URL '{}': {}", base, e)))?;

        Ok(Self {
            client: Client::new(),
            base,
        })
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn url_for(&self, path: &str) -> Result<Url> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| ViewerError::Config(format!("Invalid path '{}': {}", path, e)))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String> {
        let url = self.url_for(path)?;
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ViewerError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
