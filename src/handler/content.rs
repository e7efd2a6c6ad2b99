//! Content endpoint handlers
//!
//! Serialize the content tables as JSON arrays.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use super::router::Endpoint;
use crate::content::ContentStore;
use crate::error::ApiError;
use crate::http;

/// Serve the collection behind a resolved endpoint
pub fn serve(
    endpoint: Endpoint,
    store: &ContentStore,
    is_head: bool,
) -> Result<Response<Full<Bytes>>, ApiError> {
    match endpoint {
        Endpoint::Solutions => list_solutions(store, is_head),
        Endpoint::Enrichment => list_enrichment_activities(store, is_head),
    }
}

/// `GET /api/v1/solutions`
pub fn list_solutions(
    store: &ContentStore,
    is_head: bool,
) -> Result<Response<Full<Bytes>>, ApiError> {
    http::build_json_response(store.list_solutions(), is_head)
}

/// `GET /api/v1/enrichment`
pub fn list_enrichment_activities(
    store: &ContentStore,
    is_head: bool,
) -> Result<Response<Full<Bytes>>, ApiError> {
    http::build_json_response(store.list_enrichment_activities(), is_head)
}
