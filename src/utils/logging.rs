//! Logging utilities
//!
//! Provides logging setup and configuration.

use env_logger::Env;

/// Setup logging for the client.
///
/// `RUST_LOG` overrides the default `warn` level, which keeps the
/// interactive prompt free of protocol chatter.
pub fn setup_logging() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
}
