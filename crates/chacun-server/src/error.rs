//! Error types for chacun-server

use thiserror::Error;

/// Server error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Config(#[from] ron::error::SpannedError),

    #[error("Invalid listen address {0:?}")]
    ListenAddress(String),

    #[error("WebSocket error: {0}")]
    Wire(#[from] chacun_wire::Error),

    #[error("Game error: {0}")]
    Game(#[from] chacun_game::Error),

    #[error("Handshake exceeds {0} bytes")]
    HandshakeTooLarge(usize),

    #[error("Connection closed during the handshake")]
    HandshakeIncomplete,

    #[error("Not a WebSocket upgrade request")]
    NotAnUpgrade,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
