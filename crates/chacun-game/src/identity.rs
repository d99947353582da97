//! Identifiers for tiles, zones and animals
//!
//! Ids are hierarchical: a zone id is its tile id times ten plus a local id,
//! and an animal id is its zone id times ten plus its rank in the zone.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a tile in the catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u32);

impl TileId {
    /// Get the raw ID value
    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a zone, unique across the whole catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(pub u32);

impl ZoneId {
    /// Largest local id a zone can have within its tile
    pub const MAX_LOCAL_ID: u8 = 9;

    /// Build a zone id from its tile and its local id
    ///
    /// Callers validate `local` against [`ZoneId::MAX_LOCAL_ID`] first, a
    /// larger value would spill into the next tile's ids.
    pub fn new(tile: TileId, local: u8) -> Self {
        debug_assert!(local <= Self::MAX_LOCAL_ID);
        Self(tile.0 * 10 + u32::from(local))
    }

    /// Tile this zone belongs to
    pub fn tile_id(&self) -> TileId {
        TileId(self.0 / 10)
    }

    /// Local id of the zone within its tile
    pub fn local_id(&self) -> u8 {
        (self.0 % 10) as u8
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an animal drawn on a meadow
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimalId(pub u32);

impl AnimalId {
    /// Most animals a single meadow can hold
    pub const MAX_PER_ZONE: usize = 10;

    pub fn new(zone: ZoneId, rank: u8) -> Self {
        debug_assert!(usize::from(rank) < Self::MAX_PER_ZONE);
        Self(zone.0 * 10 + u32::from(rank))
    }

    pub fn zone_id(&self) -> ZoneId {
        ZoneId(self.0 / 10)
    }

    pub fn tile_id(&self) -> TileId {
        self.zone_id().tile_id()
    }
}

impl fmt::Display for AnimalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
