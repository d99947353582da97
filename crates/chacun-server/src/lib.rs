//! ChaCuN Server - WebSocket server for multiplayer ChaCuN games
//!
//! This crate provides:
//! - A WebSocket server over tokio (`WebSocketServer`, `WebSocketHandler`)
//! - Per-connection handles with an outbound queue (`WebSocketChannel`)
//! - Rooms for broadcasting (`Broadcaster`)
//! - Ping-based liveness checks (`TimeoutWatcher`)
//! - The game handler tying it to `chacun-lobby` (`GameServer`)
//!
//! ## Running
//!
//! ```text
//! CHACUN_LOG=debug chacun-server config.ron
//! ```

mod broadcaster;
mod channel;
mod config;
mod connection;
mod error;
mod game;
mod handler;
mod logging;
mod server;
mod watcher;

pub use broadcaster::Broadcaster;
pub use channel::{ChannelId, Outbound, WebSocketChannel};
pub use config::{ConnectionLimits, ServerConfig};
pub use connection::{accept_handshake, serve_connection};
pub use error::{Error, Result};
pub use game::GameServer;
pub use handler::WebSocketHandler;
pub use logging::{init_logging, LOG_ENV};
pub use server::WebSocketServer;
pub use watcher::{verdict, TimeoutWatcher, Verdict, PLAYER_TIMEOUT};

use std::sync::Arc;

/// Serve games until interrupted
pub async fn run(config: ServerConfig) -> Result<()> {
    let catalogue = Arc::new(config.catalogue()?);
    tracing::info!(tiles = catalogue.len(), "tile catalogue loaded");

    let game_server = Arc::new(GameServer::new(catalogue, config.ping_interval()));
    let watcher = game_server.watcher().clone().spawn();
    let server = WebSocketServer::bind(config.listen_addr()?, game_server, config.limits()).await?;

    let outcome = tokio::select! {
        outcome = server.run() => outcome,
        signal = tokio::signal::ctrl_c() => {
            tracing::info!("shutting down");
            signal.map_err(Error::from)
        }
    };
    watcher.abort();
    outcome
}
