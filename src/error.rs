//! Custom error types for paperscout

use thiserror::Error;

/// Main error type for paperscout operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Feed parse error: {0}")]
    FeedParse(#[from] quick_xml::Error),

    #[error("Scrape error: {0}")]
    Scrape(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Oracle error: {0}")]
    Oracle(String),

    #[error("Notification error: {0}")]
    Notify(String),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Not initialized: run 'paperscout init' first")]
    NotInitialized,

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

/// Result type alias for paperscout
pub type Result<T> = std::result::Result<T, Error>;
