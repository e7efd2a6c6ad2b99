//! Error types
//!
//! `ApiError` covers everything a request can fail with; `ServerError` covers
//! process startup.

use hyper::{Method, StatusCode};
use thiserror::Error;

/// Request-level failures, each mapped to an HTTP status.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No route for {path}")]
    NotFound { path: String },

    #[error("Request method '{method}' is not supported on {path}")]
    MethodNotAllowed { method: Method, path: String },

    #[error("Request body of {size} bytes exceeds the limit of {limit} bytes")]
    PayloadTooLarge { size: u64, limit: u64 },

    #[error("Failed to serialize response: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message exposed to clients. Internal failures stay generic.
    pub fn public_message(&self) -> String {
        match self {
            Self::Serialization(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

/// Startup failures.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid listen address '{address}': {source}")]
    InvalidAddress {
        address: String,
        source: std::net::AddrParseError,
    },

    #[error("Invalid CORS method '{0}'")]
    InvalidCorsMethod(String),

    #[error("Logger initialization failed: {0}")]
    Logger(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
