use anyhow::Context;
use std::sync::Arc;

use nmbk_backend::config::{AppState, Config};
use nmbk_backend::{logger, server};

fn main() -> anyhow::Result<()> {
    let cfg = Config::load().context("Failed to load configuration")?;
    logger::init(&cfg.logging)?;

    // Create the Tokio runtime, worker count follows server.workers
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder
        .build()
        .context("Failed to build Tokio runtime")?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> anyhow::Result<()> {
    let addr = cfg.get_socket_addr()?;
    let state = Arc::new(AppState::new(&cfg)?);

    let listener = server::create_listener(addr).with_context(|| format!("Failed to bind {addr}"))?;

    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals))
        .context("Failed to install signal handlers")?;

    logger::log_server_start(&addr, &cfg);

    server::start_server_loop(listener, state, Arc::clone(&signals.shutdown)).await;
    Ok(())
}
