// Connection handling module
// Accepts single TCP connections and serves them with hyper

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use hyper_util::server::graceful::GracefulShutdown;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

use crate::config::{AppState, PerformanceConfig};
use crate::handler;
use crate::logger;

/// Where a connection is in its request cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Opened, first request head not received yet
    AwaitingRequest,
    /// A request is being answered
    Handling,
    /// Response produced; delivering it and waiting for the next request
    Idle,
}

impl Phase {
    pub const fn label(self) -> &'static str {
        match self {
            Self::AwaitingRequest => "read",
            Self::Handling => "write",
            Self::Idle => "keep-alive",
        }
    }
}

/// Time limits for each phase, from `[performance]`
#[derive(Debug, Clone, Copy)]
pub struct ConnectionLimits {
    pub read: Duration,
    pub write: Duration,
    pub keep_alive: Duration,
}

impl ConnectionLimits {
    pub const fn from_config(config: &PerformanceConfig) -> Self {
        Self {
            read: Duration::from_secs(config.read_timeout),
            write: Duration::from_secs(config.write_timeout),
            keep_alive: Duration::from_secs(config.keep_alive_timeout),
        }
    }

    /// An idle connection first gets `write` to flush the response, then
    /// `keep_alive` for the next request to arrive.
    pub fn limit(&self, phase: Phase) -> Duration {
        match phase {
            Phase::AwaitingRequest => self.read,
            Phase::Handling => self.write,
            Phase::Idle => self.write + self.keep_alive,
        }
    }
}

/// Per-connection deadline, moved forward on every request
#[derive(Debug)]
pub struct ConnectionClock {
    limits: ConnectionLimits,
    state: Mutex<(Phase, Instant)>,
}

impl ConnectionClock {
    pub fn new(limits: ConnectionLimits) -> Self {
        Self {
            limits,
            state: Mutex::new((Phase::AwaitingRequest, Instant::now())),
        }
    }

    pub fn enter(&self, phase: Phase) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        *state = (phase, Instant::now());
    }

    /// Current phase and the instant it runs out
    pub fn deadline(&self) -> (Phase, Instant) {
        let (phase, since) = *self.state.lock().unwrap_or_else(PoisonError::into_inner);
        (phase, since + self.limits.limit(phase))
    }

    /// Resolve once the current phase outlives its limit
    pub async fn expired(&self) -> Phase {
        loop {
            let (phase, deadline) = self.deadline();
            if Instant::now() >= deadline {
                return phase;
            }
            tokio::time::sleep_until(deadline).await;
        }
    }
}

/// Accept and process a connection, checking limits and logging.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
/// * `conn_counter` - Active connection counter
/// * `graceful` - Shutdown watcher the connection registers with
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
    graceful: &GracefulShutdown,
) {
    // Increment counter first, then check limit (prevents race condition)
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            // Exceeded limit: rollback counter and reject
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection from {peer_addr} rejected."
            ));
            drop(stream);
            return;
        }
    }

    logger::log_connection_accepted(&peer_addr);

    handle_connection(
        stream,
        peer_addr,
        Arc::clone(state),
        Arc::clone(conn_counter),
        graceful,
    );
}

/// Handle a single connection in a spawned task.
///
/// This function:
/// 1. Wraps the TCP stream in `TokioIo`
/// 2. Configures HTTP/1.1 connection settings (keep-alive)
/// 3. Serves the connection with the request handler
/// 4. Closes it when the current phase outlives its limit
/// 5. Decrements connection counter when done
fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
    graceful: &GracefulShutdown,
) {
    let io = TokioIo::new(stream);

    let performance = &state.config.performance;
    let limits = ConnectionLimits::from_config(performance);
    let clock = Arc::new(ConnectionClock::new(limits));

    let mut builder = http1::Builder::new();
    builder.keep_alive(performance.keep_alive_timeout > 0);

    let service_state = Arc::clone(&state);
    let service_clock = Arc::clone(&clock);
    let service = service_fn(move |req| {
        let state = Arc::clone(&service_state);
        let clock = Arc::clone(&service_clock);
        async move {
            clock.enter(Phase::Handling);
            let response = handler::handle_request(req, state, Some(peer_addr)).await;
            clock.enter(Phase::Idle);
            response
        }
    });

    let conn = graceful.watch(builder.serve_connection(io, service));

    tokio::spawn(async move {
        tokio::select! {
            result = conn => {
                if let Err(err) = result {
                    logger::log_connection_error(&err);
                }
            }
            phase = clock.expired() => {
                logger::log_connection_timeout(&peer_addr, phase.label(), limits.limit(phase));
            }
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> ConnectionLimits {
        ConnectionLimits {
            read: Duration::from_secs(1),
            write: Duration::from_secs(2),
            keep_alive: Duration::from_secs(75),
        }
    }

    #[test]
    fn test_limit_per_phase() {
        let limits = limits();
        assert_eq!(limits.limit(Phase::AwaitingRequest), Duration::from_secs(1));
        assert_eq!(limits.limit(Phase::Handling), Duration::from_secs(2));
        assert_eq!(limits.limit(Phase::Idle), Duration::from_secs(77));
    }

    #[tokio::test]
    async fn test_requests_move_the_deadline() {
        let clock = ConnectionClock::new(limits());
        let (phase, first) = clock.deadline();
        assert_eq!(phase, Phase::AwaitingRequest);

        clock.enter(Phase::Handling);
        clock.enter(Phase::Idle);
        let (phase, idle) = clock.deadline();
        assert_eq!(phase, Phase::Idle);
        // The idle window outlasts the read limit of a fresh connection
        assert!(idle >= first + Duration::from_secs(70));
    }

    #[tokio::test]
    async fn test_expired_reports_phase() {
        let clock = ConnectionClock::new(ConnectionLimits {
            read: Duration::ZERO,
            write: Duration::ZERO,
            keep_alive: Duration::ZERO,
        });
        clock.enter(Phase::Idle);
        let phase = tokio::time::timeout(Duration::from_secs(1), clock.expired())
            .await
            .unwrap();
        assert_eq!(phase, Phase::Idle);
    }
}
