//! HTTP protocol layer module
//!
//! Response builders and the cross-origin policy, decoupled from routing.

pub mod cors;
pub mod response;

// Re-export commonly used types
pub use cors::CorsPolicy;
pub use response::{
    build_error_response, build_health_response, build_json_response, build_options_response,
    ALLOWED_METHODS,
};
