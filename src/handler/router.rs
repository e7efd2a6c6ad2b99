//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for the health probe,
//! body size validation, CORS and route dispatch.

use crate::config::AppState;
use crate::error::ApiError;
use crate::handler::content;
use crate::http::{self, CorsPolicy};
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderMap, HeaderValue, CONTENT_LENGTH, SERVER};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Base path of every content route
pub const API_PREFIX: &str = "/api/v1";

/// Routes served under [`API_PREFIX`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Solutions,
    Enrichment,
}

impl Endpoint {
    /// Resolve a request path to an endpoint (exact match, no trailing slash)
    pub fn resolve(path: &str) -> Option<Self> {
        match path.strip_prefix(API_PREFIX)? {
            "/solutions" => Some(Self::Solutions),
            "/enrichment" => Some(Self::Enrichment),
            _ => None,
        }
    }
}

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: Option<SocketAddr>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();

    let entry = state.config.logging.access_log.then(|| {
        AccessLogEntry::from_request(
            peer_addr,
            req.method(),
            req.uri(),
            req.version(),
            req.headers(),
        )
    });

    let mut response = route(&req, &state);
    set_server_header(response.headers_mut(), &state.config.http.server_name);

    if let Some(mut entry) = entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Produce the response for a request
pub fn route<B>(req: &Request<B>, state: &AppState) -> Response<Full<Bytes>> {
    let method = req.method();
    let path = req.uri().path();
    let is_head = method == Method::HEAD;

    // 0. Health check endpoint (highest priority, always fast)
    let health = &state.config.health;
    if health.enabled && path == health.liveness_path && (is_head || method == Method::GET) {
        return http::build_health_response("ok", is_head);
    }

    // 1. Check body size
    if let Err(err) = check_body_size(req.headers(), state.config.http.max_body_size) {
        return error_response(&err, method, path, is_head);
    }

    // 2. CORS preflight is answered by the policy, whether or not the route exists
    if CorsPolicy::is_preflight(method, req.headers()) && state.cors.applies_to(path) {
        return state.cors.preflight_response(req.headers());
    }

    // 3. Dispatch
    let mut response =
        dispatch(method, path, state).unwrap_or_else(|err| error_response(&err, method, path, is_head));

    // 4. CORS headers for actual requests
    state
        .cors
        .apply(path, req.headers(), response.headers_mut());

    response
}

fn dispatch(
    method: &Method,
    path: &str,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, ApiError> {
    let endpoint = Endpoint::resolve(path).ok_or_else(|| ApiError::NotFound {
        path: path.to_string(),
    })?;

    match *method {
        Method::GET | Method::HEAD => {
            content::serve(endpoint, &state.content, *method == Method::HEAD)
        }
        Method::OPTIONS => Ok(http::build_options_response()),
        _ => Err(ApiError::MethodNotAllowed {
            method: method.clone(),
            path: path.to_string(),
        }),
    }
}

/// Validate Content-Length header and fail with 413 if exceeded
fn check_body_size(headers: &HeaderMap, max_body_size: u64) -> Result<(), ApiError> {
    let Some(content_length) = headers.get(CONTENT_LENGTH) else {
        return Ok(());
    };

    match content_length.to_str().map(str::parse::<u64>) {
        Ok(Ok(size)) if size > max_body_size => Err(ApiError::PayloadTooLarge {
            size,
            limit: max_body_size,
        }),
        Ok(Ok(_)) => Ok(()),
        _ => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: {content_length:?}, skipping size check"
            ));
            Ok(())
        }
    }
}

fn error_response(
    err: &ApiError,
    method: &Method,
    path: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    logger::log_api_error(err, method, path);
    http::build_error_response(err, path, is_head)
}

fn set_server_header(headers: &mut HeaderMap, server_name: &str) {
    if let Ok(value) = HeaderValue::from_str(server_name) {
        headers.insert(SERVER, value);
    }
}
