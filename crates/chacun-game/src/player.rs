//! Players and the occupants they place on tiles

use crate::identity::ZoneId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Colour identifying a player
///
/// Players are ordered by colour, which is also the order they are assigned in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlayerColor {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
}

impl PlayerColor {
    pub const ALL: [PlayerColor; 5] = [
        PlayerColor::Red,
        PlayerColor::Blue,
        PlayerColor::Green,
        PlayerColor::Yellow,
        PlayerColor::Purple,
    ];
}

impl fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlayerColor::Red => "red",
            PlayerColor::Blue => "blue",
            PlayerColor::Green => "green",
            PlayerColor::Yellow => "yellow",
            PlayerColor::Purple => "purple",
        };
        f.write_str(name)
    }
}

/// Kind of occupant a player can place
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OccupantKind {
    Pawn,
    Hut,
}

impl OccupantKind {
    pub const ALL: [OccupantKind; 2] = [OccupantKind::Pawn, OccupantKind::Hut];

    /// Number of occupants of this kind each player owns
    pub fn count(self) -> u32 {
        match self {
            OccupantKind::Pawn => 5,
            OccupantKind::Hut => 3,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// An occupant placed in a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Occupant {
    pub kind: OccupantKind,
    pub zone_id: ZoneId,
}

impl Occupant {
    pub fn new(kind: OccupantKind, zone_id: ZoneId) -> Self {
        Self { kind, zone_id }
    }

    pub fn pawn(zone_id: ZoneId) -> Self {
        Self::new(OccupantKind::Pawn, zone_id)
    }

    pub fn hut(zone_id: ZoneId) -> Self {
        Self::new(OccupantKind::Hut, zone_id)
    }
}
