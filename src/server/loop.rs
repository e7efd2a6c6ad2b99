// Server loop module
// Accepts connections until shutdown, then drains open connections

use hyper_util::server::graceful::GracefulShutdown;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Serve connections from `listener` until `shutdown` is notified.
///
/// After the signal the listener is closed and open connections get
/// `server.shutdown_grace_period` seconds to finish their in-flight requests.
pub async fn start_server_loop(listener: TcpListener, state: Arc<AppState>, shutdown: Arc<Notify>) {
    let active_connections = Arc::new(AtomicUsize::new(0));
    let graceful = GracefulShutdown::new();

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(
                            stream,
                            peer_addr,
                            &state,
                            &active_connections,
                            &graceful,
                        );
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.notified() => break,
        }
    }

    // Stop accepting before draining
    drop(listener);

    let grace = Duration::from_secs(state.config.server.shutdown_grace_period);
    let remaining = tokio::select! {
        () = graceful.shutdown() => 0,
        () = tokio::time::sleep(grace) => active_connections.load(Ordering::SeqCst),
    };

    logger::log_shutdown_complete(remaining);
}
