//! ChaCuN game server
//!
//! Usage: `chacun-server [config.ron]`. Without a path the defaults are used.

use chacun_server::{init_logging, ServerConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    init_logging();

    match start() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            eprintln!("chacun-server: {err}");
            ExitCode::FAILURE
        }
    }
}

fn start() -> chacun_server::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!(path, "loading configuration");
            ServerConfig::load(&path)?
        }
        None => ServerConfig::default(),
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.worker_threads())
        .enable_all()
        .build()?;
    runtime.block_on(chacun_server::run(config))
}
