//! Cross-origin resource sharing
//!
//! Evaluates the `Origin` of browser requests against the configured
//! allow-list. Requests from other origins are still served, they just do
//! not receive any `Access-Control-*` headers and the browser blocks them.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE,
    ACCESS_CONTROL_REQUEST_HEADERS, ACCESS_CONTROL_REQUEST_METHOD, ALLOW, ORIGIN, VARY,
};
use hyper::{Method, Response, StatusCode};

use crate::config::CorsConfig;
use crate::error::ServerError;

const WILDCARD: &str = "*";

/// Which request paths the policy covers
#[derive(Debug, Clone, PartialEq, Eq)]
enum PathPattern {
    /// `/api/**`: `/api` itself and everything below it
    Subtree(String),
    Exact(String),
}

impl PathPattern {
    fn parse(pattern: &str) -> Self {
        pattern.strip_suffix("/**").map_or_else(
            || Self::Exact(pattern.to_string()),
            |base| Self::Subtree(base.to_string()),
        )
    }

    fn matches(&self, path: &str) -> bool {
        match self {
            Self::Subtree(base) => {
                path == base
                    || path
                        .strip_prefix(base.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            }
            Self::Exact(exact) => path == exact,
        }
    }
}

/// Compiled CORS policy
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    paths: PathPattern,
    origins: Vec<String>,
    any_origin: bool,
    methods: Vec<Method>,
    methods_header: HeaderValue,
    headers: Vec<String>,
    any_header: bool,
    allow_credentials: bool,
    max_age: u64,
}

/// Outcome of a successful preflight evaluation
struct PreflightGrant {
    origin: HeaderValue,
    allow_headers: Option<HeaderValue>,
}

impl CorsPolicy {
    /// Build the policy, rejecting method names that are not valid HTTP tokens
    pub fn from_config(config: &CorsConfig) -> Result<Self, ServerError> {
        let methods = config
            .allowed_methods
            .iter()
            .map(|m| {
                Method::from_bytes(m.trim().to_ascii_uppercase().as_bytes())
                    .map_err(|_| ServerError::InvalidCorsMethod(m.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let joined = methods
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let methods_header = HeaderValue::from_str(&joined)
            .map_err(|_| ServerError::InvalidCorsMethod(joined.clone()))?;

        Ok(Self {
            paths: PathPattern::parse(&config.path_pattern),
            any_origin: config.allowed_origins.iter().any(|o| o == WILDCARD),
            origins: config.allowed_origins.clone(),
            methods,
            methods_header,
            any_header: config.allowed_headers.iter().any(|h| h == WILDCARD),
            headers: config
                .allowed_headers
                .iter()
                .map(|h| h.trim().to_ascii_lowercase())
                .collect(),
            allow_credentials: config.allow_credentials,
            max_age: config.max_age,
        })
    }

    /// Whether the policy covers this request path
    pub fn applies_to(&self, path: &str) -> bool {
        self.paths.matches(path)
    }

    /// Whether the origin is on the allow-list (exact comparison)
    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        self.any_origin || self.origins.iter().any(|o| o == origin)
    }

    /// A preflight is an OPTIONS request announcing the method it wants to send
    pub fn is_preflight(method: &Method, headers: &HeaderMap) -> bool {
        method == Method::OPTIONS
            && headers.contains_key(ORIGIN)
            && headers.contains_key(ACCESS_CONTROL_REQUEST_METHOD)
    }

    /// Add CORS headers to the response of an actual (non-preflight) request
    pub fn apply(&self, path: &str, request: &HeaderMap, response: &mut HeaderMap) {
        if !self.applies_to(path) {
            return;
        }
        let Some(origin) = request.get(ORIGIN) else {
            return;
        };

        response.append(VARY, HeaderValue::from_static("Origin"));

        if origin.to_str().is_ok_and(|o| self.is_origin_allowed(o)) {
            response.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
            if self.allow_credentials {
                response.insert(
                    ACCESS_CONTROL_ALLOW_CREDENTIALS,
                    HeaderValue::from_static("true"),
                );
            }
        }
    }

    /// Answer a preflight request
    ///
    /// Rejected preflights still get 200, only without `Access-Control-*`
    /// headers.
    pub fn preflight_response(&self, request: &HeaderMap) -> Response<Full<Bytes>> {
        let mut builder = Response::builder()
            .status(StatusCode::OK)
            .header(ALLOW, super::response::ALLOWED_METHODS)
            .header(
                VARY,
                "Origin, Access-Control-Request-Method, Access-Control-Request-Headers",
            );

        if let Some(grant) = self.evaluate_preflight(request) {
            builder = builder
                .header(ACCESS_CONTROL_ALLOW_ORIGIN, grant.origin)
                .header(ACCESS_CONTROL_ALLOW_METHODS, self.methods_header.clone())
                .header(ACCESS_CONTROL_MAX_AGE, self.max_age);
            if let Some(allow_headers) = grant.allow_headers {
                builder = builder.header(ACCESS_CONTROL_ALLOW_HEADERS, allow_headers);
            }
            if self.allow_credentials {
                builder = builder.header(ACCESS_CONTROL_ALLOW_CREDENTIALS, "true");
            }
        } else {
            crate::logger::log_cors_rejected(request.get(ORIGIN));
        }

        builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
            crate::logger::log_error(&format!("Failed to build preflight response: {e}"));
            Response::new(Full::new(Bytes::new()))
        })
    }

    fn evaluate_preflight(&self, request: &HeaderMap) -> Option<PreflightGrant> {
        let origin = request.get(ORIGIN)?;
        if !self.is_origin_allowed(origin.to_str().ok()?) {
            return None;
        }

        let requested_method = request
            .get(ACCESS_CONTROL_REQUEST_METHOD)
            .and_then(|v| Method::from_bytes(v.as_bytes()).ok())?;
        if !self.methods.contains(&requested_method) {
            return None;
        }

        let allow_headers = match request.get(ACCESS_CONTROL_REQUEST_HEADERS) {
            None => None,
            Some(requested) => {
                let list = requested.to_str().ok()?;
                let all_allowed = self.any_header
                    || list
                        .split(',')
                        .map(|h| h.trim().to_ascii_lowercase())
                        .filter(|h| !h.is_empty())
                        .all(|h| self.headers.contains(&h));
                if !all_allowed {
                    return None;
                }
                Some(requested.clone())
            }
        };

        Some(PreflightGrant {
            origin: origin.clone(),
            allow_headers,
        })
    }
}
