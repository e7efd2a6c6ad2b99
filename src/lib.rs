//! nmbk-backend
//!
//! Read-only content API for the NMBK site: solutions and enrichment
//! activities served as JSON under `/api/v1`, with a CORS allow-list for the
//! front-end dev servers.

pub mod config;
pub mod content;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use error::{ApiError, ServerError};
