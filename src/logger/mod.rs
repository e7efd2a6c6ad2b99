//! Logger module
//!
//! Provides logging utilities for the HTTP server including:
//! - Subscriber setup (compact text or JSON lines, `RUST_LOG` aware)
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging

mod format;

pub use format::AccessLogEntry;

use hyper::header::HeaderValue;
use hyper::Method;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, LogFormat, LoggingConfig};
use crate::error::{ApiError, ServerError};

/// Target used for access log lines, filterable with `RUST_LOG=access=off`
pub const ACCESS_TARGET: &str = "access";

/// Initialize the global subscriber with configuration
///
/// Should be called once at application startup. `RUST_LOG` takes precedence
/// over `logging.level`.
pub fn init(config: &LoggingConfig) -> Result<(), ServerError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| ServerError::Logger(format!("invalid level '{}': {e}", config.level)))?;

    let json = config.format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| {
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .compact()
        }))
        .try_init()
        .map_err(|e| ServerError::Logger(e.to_string()))
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    info!(
        address = %addr,
        workers = ?config.server.workers,
        max_connections = ?config.performance.max_connections,
        "Server listening on http://{addr}"
    );
    info!(
        origins = ?config.cors.allowed_origins,
        credentials = config.cors.allow_credentials,
        "CORS enabled for {}",
        config.cors.path_pattern
    );
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    debug!(peer = %peer_addr, "Connection accepted");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    warn!("Failed to serve connection: {err:?}");
}

pub fn log_connection_timeout(peer_addr: &SocketAddr, phase: &str, limit: Duration) {
    debug!(peer = %peer_addr, phase, "Connection closed after {}s {phase} timeout", limit.as_secs());
}

pub fn log_error(message: &str) {
    error!("{message}");
}

pub fn log_warning(message: &str) {
    warn!("{message}");
}

/// Log a failed request; only server-side failures are errors
pub fn log_api_error(err: &ApiError, method: &Method, path: &str) {
    if err.status().is_server_error() {
        error!(%method, path, "{err}");
    } else {
        debug!(%method, path, status = err.status().as_u16(), "{err}");
    }
}

pub fn log_cors_rejected(origin: Option<&HeaderValue>) {
    debug!(origin = ?origin, "CORS preflight rejected");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    info!(target: ACCESS_TARGET, "{}", entry.format(format));
}

pub fn log_shutdown_requested(signal: &str) {
    info!(signal, "Shutdown requested, no longer accepting connections");
}

pub fn log_shutdown_complete(open_connections: usize) {
    if open_connections == 0 {
        info!("Server shutdown complete");
    } else {
        warn!(open_connections, "Grace period elapsed, dropping open connections");
    }
}
