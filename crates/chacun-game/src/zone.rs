//! Zones of a tile and the animals living in them

use crate::identity::{AnimalId, TileId, ZoneId};
use serde::{Deserialize, Serialize};

/// Kind of animal found in meadows
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AnimalKind {
    Mammoth,
    Aurochs,
    Deer,
    Tiger,
}

/// An animal drawn on a meadow zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Animal {
    pub id: AnimalId,
    pub kind: AnimalKind,
}

impl Animal {
    pub fn new(id: AnimalId, kind: AnimalKind) -> Self {
        Self { id, kind }
    }

    pub fn tile_id(&self) -> TileId {
        self.id.tile_id()
    }
}

/// Special power attached to a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SpecialPower {
    Shaman,
    Logboat,
    HuntingTrap,
    PitTrap,
    WildFire,
    Raft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ForestKind {
    #[default]
    Plain,
    WithMenhir,
    WithMushrooms,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Forest {
    pub id: ZoneId,
    pub kind: ForestKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Meadow {
    pub id: ZoneId,
    pub animals: Vec<Animal>,
    pub special_power: Option<SpecialPower>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Lake {
    pub id: ZoneId,
    pub fish_count: u32,
    pub special_power: Option<SpecialPower>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct River {
    pub id: ZoneId,
    pub fish_count: u32,
    pub lake: Option<Lake>,
}

impl River {
    pub fn has_lake(&self) -> bool {
        self.lake.is_some()
    }
}

/// Lake or river: the zones a river system is made of
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Water {
    Lake(Lake),
    River(River),
}

impl Water {
    pub fn fish_count(&self) -> u32 {
        match self {
            Water::Lake(lake) => lake.fish_count,
            Water::River(river) => river.fish_count,
        }
    }
}

impl From<Lake> for Water {
    fn from(lake: Lake) -> Self {
        Water::Lake(lake)
    }
}

impl From<River> for Water {
    fn from(river: River) -> Self {
        Water::River(river)
    }
}

/// Any zone of a tile
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Zone {
    Forest(Forest),
    Meadow(Meadow),
    Lake(Lake),
    River(River),
}

impl Zone {
    /// The zone as part of a river system, if it is a lake or a river
    pub fn as_water(&self) -> Option<Water> {
        match self {
            Zone::Lake(lake) => Some(Water::Lake(lake.clone())),
            Zone::River(river) => Some(Water::River(river.clone())),
            Zone::Forest(_) | Zone::Meadow(_) => None,
        }
    }
}

/// Common accessors shared by every zone type
pub trait ZoneLike: Clone + PartialEq + std::fmt::Debug {
    fn id(&self) -> ZoneId;

    fn special_power(&self) -> Option<SpecialPower> {
        None
    }

    fn tile_id(&self) -> TileId {
        self.id().tile_id()
    }

    fn local_id(&self) -> u8 {
        self.id().local_id()
    }
}

impl ZoneLike for Forest {
    fn id(&self) -> ZoneId {
        self.id
    }
}

impl ZoneLike for Meadow {
    fn id(&self) -> ZoneId {
        self.id
    }

    fn special_power(&self) -> Option<SpecialPower> {
        self.special_power
    }
}

impl ZoneLike for Lake {
    fn id(&self) -> ZoneId {
        self.id
    }

    fn special_power(&self) -> Option<SpecialPower> {
        self.special_power
    }
}

impl ZoneLike for River {
    fn id(&self) -> ZoneId {
        self.id
    }
}

impl ZoneLike for Water {
    fn id(&self) -> ZoneId {
        match self {
            Water::Lake(lake) => lake.id,
            Water::River(river) => river.id,
        }
    }

    fn special_power(&self) -> Option<SpecialPower> {
        match self {
            Water::Lake(lake) => lake.special_power,
            Water::River(_) => None,
        }
    }
}

impl ZoneLike for Zone {
    fn id(&self) -> ZoneId {
        match self {
            Zone::Forest(zone) => zone.id,
            Zone::Meadow(zone) => zone.id,
            Zone::Lake(zone) => zone.id,
            Zone::River(zone) => zone.id,
        }
    }

    fn special_power(&self) -> Option<SpecialPower> {
        match self {
            Zone::Meadow(zone) => zone.special_power,
            Zone::Lake(zone) => zone.special_power,
            Zone::Forest(_) | Zone::River(_) => None,
        }
    }
}
