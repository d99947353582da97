//! Tiles, their sides, and tiles placed on the board

use crate::error::{Error, Result};
use crate::geometry::{Direction, Pos, Rotation};
use crate::identity::{TileId, ZoneId};
use crate::player::{Occupant, OccupantKind, PlayerColor};
use crate::zone::{Forest, Meadow, River, Zone, ZoneLike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// One side of a tile
///
/// The zones of a river side are listed clockwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TileSide {
    Forest(Forest),
    Meadow(Meadow),
    River {
        meadow1: Meadow,
        river: River,
        meadow2: Meadow,
    },
}

impl TileSide {
    pub fn zones(&self) -> Vec<Zone> {
        match self {
            TileSide::Forest(forest) => vec![Zone::Forest(forest.clone())],
            TileSide::Meadow(meadow) => vec![Zone::Meadow(meadow.clone())],
            TileSide::River {
                meadow1,
                river,
                meadow2,
            } => vec![
                Zone::Meadow(meadow1.clone()),
                Zone::River(river.clone()),
                Zone::Meadow(meadow2.clone()),
            ],
        }
    }

    pub fn is_same_kind_as(&self, other: &TileSide) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Start,
    Normal,
    Menhir,
}

/// A tile of the catalogue
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tile {
    pub id: TileId,
    pub kind: TileKind,
    pub n: TileSide,
    pub e: TileSide,
    pub s: TileSide,
    pub w: TileSide,
}

impl Tile {
    /// Sides in N, E, S, W order
    pub fn sides(&self) -> [&TileSide; 4] {
        [&self.n, &self.e, &self.s, &self.w]
    }

    pub fn side(&self, direction: Direction) -> &TileSide {
        self.sides()[direction.index()]
    }

    /// Distinct zones touching at least one side, in order of appearance
    pub fn side_zones(&self) -> Vec<Zone> {
        let mut seen = BTreeSet::new();
        self.sides()
            .into_iter()
            .flat_map(TileSide::zones)
            .filter(|zone| seen.insert(zone.id()))
            .collect()
    }

    /// Side zones followed by the lakes attached to rivers
    pub fn zones(&self) -> Vec<Zone> {
        let side_zones = self.side_zones();
        let lakes: Vec<Zone> = side_zones
            .iter()
            .filter_map(|zone| match zone {
                Zone::River(River {
                    lake: Some(lake), ..
                }) => Some(Zone::Lake(lake.clone())),
                _ => None,
            })
            .collect();
        side_zones.into_iter().chain(lakes).collect()
    }
}

/// A tile placed on the board, possibly rotated and occupied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedTile {
    pub tile: Arc<Tile>,
    pub placer: Option<PlayerColor>,
    pub rotation: Rotation,
    pub pos: Pos,
    pub occupant: Option<Occupant>,
}

impl PlacedTile {
    pub fn new(
        tile: Arc<Tile>,
        placer: Option<PlayerColor>,
        rotation: Rotation,
        pos: Pos,
    ) -> Self {
        Self {
            tile,
            placer,
            rotation,
            pos,
            occupant: None,
        }
    }

    pub fn id(&self) -> TileId {
        self.tile.id
    }

    pub fn kind(&self) -> TileKind {
        self.tile.kind
    }

    /// Side facing the given direction once the rotation is applied
    pub fn side(&self, direction: Direction) -> &TileSide {
        self.tile.side(direction.rotated(self.rotation.negated()))
    }

    pub fn zone_with_id(&self, id: ZoneId) -> Result<Zone> {
        self.tile
            .zones()
            .into_iter()
            .find(|zone| zone.id() == id)
            .ok_or(Error::ZoneNotFound(id))
    }

    pub fn special_power_zone(&self) -> Option<Zone> {
        self.tile
            .zones()
            .into_iter()
            .find(|zone| zone.special_power().is_some())
    }

    pub fn forest_zones(&self) -> Vec<Forest> {
        self.tile
            .zones()
            .into_iter()
            .filter_map(|zone| match zone {
                Zone::Forest(forest) => Some(forest),
                _ => None,
            })
            .collect()
    }

    pub fn meadow_zones(&self) -> Vec<Meadow> {
        self.tile
            .zones()
            .into_iter()
            .filter_map(|zone| match zone {
                Zone::Meadow(meadow) => Some(meadow),
                _ => None,
            })
            .collect()
    }

    pub fn river_zones(&self) -> Vec<River> {
        self.tile
            .zones()
            .into_iter()
            .filter_map(|zone| match zone {
                Zone::River(river) => Some(river),
                _ => None,
            })
            .collect()
    }

    /// Occupants the placer could put on this tile, ignoring availability
    pub fn potential_occupants(&self) -> BTreeSet<Occupant> {
        if self.placer.is_none() {
            return BTreeSet::new();
        }
        let mut occupants = BTreeSet::new();
        for zone in self.tile.zones() {
            match &zone {
                Zone::Lake(lake) => {
                    occupants.insert(Occupant::hut(lake.id));
                }
                Zone::River(river) if !river.has_lake() => {
                    occupants.insert(Occupant::pawn(river.id));
                    occupants.insert(Occupant::hut(river.id));
                }
                _ => {
                    occupants.insert(Occupant::pawn(zone.id()));
                }
            }
        }
        occupants
    }

    pub fn with_occupant(&self, occupant: Occupant) -> Result<Self> {
        if self.occupant.is_some() {
            return Err(Error::TileAlreadyOccupied(self.id()));
        }
        Ok(Self {
            occupant: Some(occupant),
            ..self.clone()
        })
    }

    pub fn with_no_occupant(&self) -> Self {
        Self {
            occupant: None,
            ..self.clone()
        }
    }

    /// Zone occupied by an occupant of the given kind, if any
    pub fn id_of_zone_occupied_by(&self, kind: OccupantKind) -> Option<ZoneId> {
        self.occupant
            .filter(|occupant| occupant.kind == kind)
            .map(|occupant| occupant.zone_id)
    }
}
