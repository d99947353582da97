//! Error types for chacun-game

use crate::geometry::Pos;
use crate::identity::{TileId, ZoneId};
use crate::player::{OccupantKind, PlayerColor};
use crate::state::NextAction;
use crate::tile::TileKind;
use thiserror::Error;

/// Rules engine error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Zone not found: {0}")]
    ZoneNotFound(ZoneId),

    #[error("Tile not found: {0}")]
    TileNotFound(TileId),

    #[error("Tile {0} is already occupied")]
    TileAlreadyOccupied(TileId),

    #[error("Area containing zone {0} is already occupied")]
    AreaAlreadyOccupied(ZoneId),

    #[error("Player {0} does not occupy the area")]
    OccupantNotFound(PlayerColor),

    #[error("Area not found in partition")]
    AreaNotFound,

    #[error("Area has no open side left to connect")]
    NoOpenConnection,

    #[error("Sides of different kinds cannot be connected")]
    MismatchedSides,

    #[error("A {kind:?} cannot occupy zone {zone}")]
    InvalidOccupation { kind: OccupantKind, zone: ZoneId },

    #[error("Deck of {0:?} tiles is empty")]
    EmptyDeck(TileKind),

    #[error("Tile cannot be placed at {0}")]
    IllegalPlacement(Pos),

    #[error("Expected next action {expected:?}, got {actual:?}")]
    UnexpectedAction {
        expected: NextAction,
        actual: NextAction,
    },

    #[error("Not enough players: {0}")]
    NotEnoughPlayers(usize),

    #[error("Illegal action: {0}")]
    IllegalAction(String),

    #[error("Invalid tile catalogue: {0}")]
    Catalogue(String),

    #[error("RON parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
