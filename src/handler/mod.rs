//! Request handler module
//!
//! Responsible for request routing dispatch and the content endpoints.

pub mod content;
pub mod router;

// Re-export main entry point
pub use router::{handle_request, route, Endpoint, API_PREFIX};
