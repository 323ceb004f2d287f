//! Portal error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("Portal rejected the request to {endpoint} (status {status})")]
    Rejected {
        endpoint: String,
        status: u16,
    },

    #[error("Failed to parse response from {endpoint}: {source}")]
    InvalidResponse {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected response shape from {endpoint}: {message}")]
    UnexpectedShape {
        endpoint: String,
        message: String,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<anyhow::Error> for PortalError {
    fn from(err: anyhow::Error) -> Self {
        PortalError::Config(err.to_string())
    }
}

pub type PortalResult<T> = std::result::Result<T, PortalError>;
