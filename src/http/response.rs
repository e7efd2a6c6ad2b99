//! HTTP response building module
//!
//! Provides builders for the responses the API sends, decoupled from routing.

use chrono::{SecondsFormat, Utc};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{ALLOW, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::error::ApiError;

/// Methods accepted on content routes
pub const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

const JSON_CONTENT_TYPE: &str = "application/json";

/// Error body, shaped like the Spring Boot default error document
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    timestamp: String,
    status: u16,
    error: &'a str,
    message: String,
    path: &'a str,
}

/// Build 200 JSON response
///
/// HEAD requests get the same headers, including `Content-Length`, and no body.
pub fn build_json_response<T: Serialize + ?Sized>(
    body: &T,
    is_head: bool,
) -> Result<Response<Full<Bytes>>, ApiError> {
    let json = serde_json::to_vec(body)?;
    let content_length = json.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(json)
    };

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
        .header(CONTENT_LENGTH, content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        }))
}

/// Build the JSON error response for a failed request
pub fn build_error_response(err: &ApiError, path: &str, is_head: bool) -> Response<Full<Bytes>> {
    let status = err.status();
    let payload = ErrorBody {
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        status: status.as_u16(),
        error: status.canonical_reason().unwrap_or("Error"),
        message: err.public_message(),
        path,
    };
    let json = serde_json::to_vec(&payload).unwrap_or_else(|e| {
        log_build_error(status.as_str(), &e);
        br#"{"error":"Internal Server Error"}"#.to_vec()
    });
    let content_length = json.len();

    let mut builder = Response::builder()
        .status(status)
        .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
        .header(CONTENT_LENGTH, content_length);

    if matches!(err, ApiError::MethodNotAllowed { .. }) {
        builder = builder.header(ALLOW, ALLOWED_METHODS);
    }

    let body = if is_head { Bytes::new() } else { Bytes::from(json) };

    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error(status.as_str(), &e);
        let mut fallback = Response::new(Full::new(Bytes::new()));
        *fallback.status_mut() = status;
        fallback
    })
}

/// Build OPTIONS response for a route (not a CORS preflight)
pub fn build_options_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header(ALLOW, ALLOWED_METHODS)
        .header(CONTENT_LENGTH, 0)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build health check response
pub fn build_health_response(status: &str, is_head: bool) -> Response<Full<Bytes>> {
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(status.to_string())
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/plain")
        .header(CACHE_CONTROL, "no-store, no-cache, must-revalidate")
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("health", &e);
            Response::new(Full::new(Bytes::from("ok")))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &dyn std::fmt::Display) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use hyper::Method;

    async fn body_bytes(response: Response<Full<Bytes>>) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_json_response() {
        let response = build_json_response(&["a", "b"], false).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(response.headers()[CONTENT_LENGTH], "9");
        assert_eq!(body_bytes(response).await, Bytes::from_static(br#"["a","b"]"#));
    }

    #[tokio::test]
    async fn test_head_keeps_length_drops_body() {
        let response = build_json_response(&["a", "b"], true).unwrap();
        assert_eq!(response.headers()[CONTENT_LENGTH], "9");
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_error_response_body() {
        let err = ApiError::MethodNotAllowed {
            method: Method::POST,
            path: "/api/v1/solutions".to_string(),
        };
        let response = build_error_response(&err, "/api/v1/solutions", false);
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], ALLOWED_METHODS);

        let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json["status"], 405);
        assert_eq!(json["error"], "Method Not Allowed");
        assert_eq!(json["path"], "/api/v1/solutions");
        assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn test_not_found_has_no_allow_header() {
        let err = ApiError::NotFound {
            path: "/api/v1/unknown".to_string(),
        };
        let response = build_error_response(&err, "/api/v1/unknown", false);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get(ALLOW).is_none());
    }

    #[test]
    fn test_options_response() {
        let response = build_options_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[ALLOW], "GET, HEAD, OPTIONS");
    }
}
