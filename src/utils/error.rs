// src/utils/error.rs
use thiserror::Error;

/// Failures of the page fetch collaborator. Never retried by the scraper.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP error {status} for {url}")]
    Http { status: reqwest::StatusCode, url: String },

    #[error("No page registered for {0}")]
    NotFound(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// A structural assumption about the markup did not hold.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Invalid CSS selector: {0}")]
    Selector(String),
}

impl ExtractError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        ExtractError::MalformedInput(msg.into())
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Fetching markup failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Lookup failed: {0}")]
    LookupMiss(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
