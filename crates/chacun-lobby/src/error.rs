//! Error types for chacun-lobby

use thiserror::Error;

/// Lobby error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Game error: {0}")]
    Game(#[from] chacun_game::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
