//! Logging setup for the server binary

use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the log filter, e.g. `CHACUN_LOG=debug`
pub const LOG_ENV: &str = "CHACUN_LOG";

pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
