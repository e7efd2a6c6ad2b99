// Server module entry
// Listener setup, connection handling, accept loop and signal-driven shutdown

pub mod connection;
pub mod listener;
pub mod signal;

// Rust does not allow `loop` (keyword) as a module name, use server_loop
#[path = "loop.rs"]
pub mod server_loop;

// Re-export common types
pub use listener::create_listener;
pub use server_loop::start_server_loop;
pub use signal::{start_signal_handler, SignalHandler};
