use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Failed to fetch {path}: status {status}")]
    Status { path: String, status: u16 },

    #[error("Invalid manifest: {0}")]
    Manifest(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ViewerError>;
