//! ChaCuN Game - Rules engine for a Stone Age tile-laying game
//!
//! This crate provides the immutable game model:
//! - Tiles, their sides and zones (forests, meadows, rivers, lakes)
//! - Areas of connected zones and their partitions
//! - The board, its occupants and cancelled animals
//! - Scoring and the message board describing it
//! - The turn state machine (`GameState`)
//! - The Base32 action codec exchanged between players
//!
//! ## Tile catalogue
//!
//! Tiles are data, loaded from RON. A catalogue ships with the crate:
//! ```no_run
//! let catalogue = chacun_game::TileCatalogue::builtin().unwrap();
//! let decks = catalogue.shuffled_decks("my-game");
//! ```

pub mod action;
mod area;
pub mod base32;
mod board;
mod catalogue;
mod deck;
mod error;
mod geometry;
mod identity;
mod message;
mod player;
pub mod points;
mod rng;
mod state;
mod text;
mod tile;
mod zone;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use action::StateAction;
pub use area::{Area, ZonePartition, ZonePartitionBuilder, ZonePartitions, ZonePartitionsBuilder};
pub use board::Board;
pub use catalogue::{SideDef, TileCatalogue, TileDef, ZoneDef};
pub use deck::TileDecks;
pub use error::{Error, Result};
pub use geometry::{Direction, Pos, Rotation};
pub use identity::{AnimalId, TileId, ZoneId};
pub use message::{Message, MessageBoard};
pub use player::{Occupant, OccupantKind, PlayerColor};
pub use rng::GameRng;
pub use state::{GameState, NextAction, MIN_PLAYER_COUNT};
pub use text::{TextMaker, TextMakerFr};
pub use tile::{PlacedTile, Tile, TileKind, TileSide};
pub use zone::{
    Animal, AnimalKind, Forest, ForestKind, Lake, Meadow, River, SpecialPower, Water, Zone,
    ZoneLike,
};
