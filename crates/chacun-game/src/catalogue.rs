//! RON tile catalogue
//!
//! Tiles are described by their zones, keyed by a local id, and by four
//! sides referring to those local ids:
//!
//! ```ron
//! TileCatalogue(tiles: [
//!     TileDef(id: 56, kind: Start,
//!         zones: [
//!             Meadow(local: 0, animals: [Aurochs]),
//!             Forest(local: 1, kind: WithMenhir),
//!             Meadow(local: 2),
//!             River(local: 3, lake: Some(8)),
//!             Lake(local: 8, fish: 1),
//!         ],
//!         n: Meadow(0), e: Forest(1), s: Forest(1), w: River(2, 3, 0)),
//! ])
//! ```

use crate::deck::TileDecks;
use crate::error::{Error, Result};
use crate::identity::{AnimalId, TileId, ZoneId};
use crate::rng::GameRng;
use crate::tile::{Tile, TileKind, TileSide};
use crate::zone::{Animal, AnimalKind, Forest, ForestKind, Lake, Meadow, River, SpecialPower, Zone};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;

const BUILTIN_TILES: &str = include_str!("../assets/tiles.ron");

/// Zone definition, keyed by its local id within the tile
#[derive(Debug, Clone, Deserialize)]
pub enum ZoneDef {
    Forest {
        local: u8,
        #[serde(default)]
        kind: ForestKind,
    },
    Meadow {
        local: u8,
        #[serde(default)]
        animals: Vec<AnimalKind>,
        #[serde(default)]
        power: Option<SpecialPower>,
    },
    Lake {
        local: u8,
        #[serde(default)]
        fish: u32,
        #[serde(default)]
        power: Option<SpecialPower>,
    },
    River {
        local: u8,
        #[serde(default)]
        fish: u32,
        #[serde(default)]
        lake: Option<u8>,
    },
}

impl ZoneDef {
    fn local(&self) -> u8 {
        match self {
            ZoneDef::Forest { local, .. }
            | ZoneDef::Meadow { local, .. }
            | ZoneDef::Lake { local, .. }
            | ZoneDef::River { local, .. } => *local,
        }
    }
}

/// Side definition referring to local zone ids
#[derive(Debug, Clone, Copy, Deserialize)]
pub enum SideDef {
    Forest(u8),
    Meadow(u8),
    /// Meadow, river, meadow, clockwise
    River(u8, u8, u8),
}

/// Tile definition as written in the catalogue file
#[derive(Debug, Clone, Deserialize)]
pub struct TileDef {
    pub id: u32,
    pub kind: TileKind,
    pub zones: Vec<ZoneDef>,
    pub n: SideDef,
    pub e: SideDef,
    pub s: SideDef,
    pub w: SideDef,
}

#[derive(Debug, Deserialize)]
#[serde(rename = "TileCatalogue")]
struct CatalogueFile {
    tiles: Vec<TileDef>,
}

/// Validated set of tiles a game is played with
#[derive(Debug, Clone)]
pub struct TileCatalogue {
    tiles: BTreeMap<TileId, Arc<Tile>>,
}

fn invalid(tile: u32, reason: impl std::fmt::Display) -> Error {
    Error::Catalogue(format!("tile {tile}: {reason}"))
}

impl TileCatalogue {
    /// Parse and validate a catalogue from a RON string
    pub fn from_ron_str(content: &str) -> Result<Self> {
        let file: CatalogueFile = ron::from_str(content)?;
        let mut tiles = BTreeMap::new();
        for def in &file.tiles {
            let tile = resolve_tile(def)?;
            if tiles.insert(tile.id, Arc::new(tile)).is_some() {
                return Err(invalid(def.id, "duplicate id"));
            }
        }

        let starts = tiles
            .values()
            .filter(|tile| tile.kind == TileKind::Start)
            .count();
        if starts != 1 {
            return Err(Error::Catalogue(format!(
                "expected exactly one start tile, found {starts}"
            )));
        }

        tracing::debug!(tiles = tiles.len(), "Loaded tile catalogue");
        Ok(Self { tiles })
    }

    /// Load a catalogue file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_ron_str(&content)
    }

    /// Catalogue shipped with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_ron_str(BUILTIN_TILES)
    }

    pub fn tile(&self, id: TileId) -> Option<&Arc<Tile>> {
        self.tiles.get(&id)
    }

    /// All tiles, by increasing id
    pub fn tiles(&self) -> impl Iterator<Item = &Arc<Tile>> {
        self.tiles.values()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Decks shuffled with a seed derived from the game name
    pub fn shuffled_decks(&self, game_name: &str) -> TileDecks {
        let mut tiles: Vec<Arc<Tile>> = self.tiles.values().cloned().collect();
        GameRng::from_name(game_name).shuffle(&mut tiles);
        TileDecks::from_tiles(tiles)
    }
}

fn resolve_tile(def: &TileDef) -> Result<Tile> {
    let tile_id = TileId(def.id);
    let mut locals = BTreeSet::new();
    for zone in &def.zones {
        let local = zone.local();
        if local > ZoneId::MAX_LOCAL_ID {
            return Err(invalid(def.id, format_args!("local id {local} is above {}", ZoneId::MAX_LOCAL_ID)));
        }
        if let ZoneDef::Meadow { animals, .. } = zone {
            if animals.len() > AnimalId::MAX_PER_ZONE {
                return Err(invalid(def.id, format_args!("meadow {local} holds {} animals", animals.len())));
            }
        }
        if !locals.insert(local) {
            return Err(invalid(def.id, format_args!("duplicate local id {local}")));
        }
    }

    let lakes: BTreeMap<u8, Lake> = def
        .zones
        .iter()
        .filter_map(|zone| match zone {
            ZoneDef::Lake { local, fish, power } => Some((
                *local,
                Lake {
                    id: ZoneId::new(tile_id, *local),
                    fish_count: *fish,
                    special_power: *power,
                },
            )),
            _ => None,
        })
        .collect();

    let mut zones = BTreeMap::new();
    let mut linked_lakes = BTreeSet::new();
    for zone in &def.zones {
        let local = zone.local();
        let id = ZoneId::new(tile_id, local);
        let resolved = match zone {
            ZoneDef::Forest { kind, .. } => Zone::Forest(Forest { id, kind: *kind }),
            ZoneDef::Meadow { animals, power, .. } => Zone::Meadow(Meadow {
                id,
                animals: animals
                    .iter()
                    .enumerate()
                    .map(|(rank, kind)| Animal::new(AnimalId::new(id, rank as u8), *kind))
                    .collect(),
                special_power: *power,
            }),
            ZoneDef::Lake { .. } => continue,
            ZoneDef::River { fish, lake, .. } => {
                let lake = match lake {
                    Some(lake_local) => {
                        let lake = lakes.get(lake_local).ok_or_else(|| {
                            invalid(def.id, format_args!("river {local} flows into unknown lake {lake_local}"))
                        })?;
                        linked_lakes.insert(*lake_local);
                        Some(lake.clone())
                    }
                    None => None,
                };
                Zone::River(River {
                    id,
                    fish_count: *fish,
                    lake,
                })
            }
        };
        zones.insert(local, resolved);
    }

    if let Some(lake) = lakes.keys().find(|local| !linked_lakes.contains(*local)) {
        return Err(invalid(def.id, format_args!("lake {lake} is not reached by any river")));
    }

    let mut used = BTreeSet::new();
    let mut side = |side_def: SideDef| -> Result<TileSide> {
        let forest = |local: u8| match zones.get(&local) {
            Some(Zone::Forest(forest)) => Ok(forest.clone()),
            _ => Err(invalid(def.id, format_args!("zone {local} is not a forest"))),
        };
        let meadow = |local: u8| match zones.get(&local) {
            Some(Zone::Meadow(meadow)) => Ok(meadow.clone()),
            _ => Err(invalid(def.id, format_args!("zone {local} is not a meadow"))),
        };
        let resolved = match side_def {
            SideDef::Forest(local) => {
                used.insert(local);
                TileSide::Forest(forest(local)?)
            }
            SideDef::Meadow(local) => {
                used.insert(local);
                TileSide::Meadow(meadow(local)?)
            }
            SideDef::River(meadow1, river, meadow2) => {
                used.extend([meadow1, river, meadow2]);
                let river = match zones.get(&river) {
                    Some(Zone::River(river)) => river.clone(),
                    _ => return Err(invalid(def.id, format_args!("zone {river} is not a river"))),
                };
                TileSide::River {
                    meadow1: meadow(meadow1)?,
                    river,
                    meadow2: meadow(meadow2)?,
                }
            }
        };
        Ok(resolved)
    };

    let tile = Tile {
        id: tile_id,
        kind: def.kind,
        n: side(def.n)?,
        e: side(def.e)?,
        s: side(def.s)?,
        w: side(def.w)?,
    };

    if let Some(local) = zones.keys().find(|local| !used.contains(*local)) {
        return Err(invalid(def.id, format_args!("zone {local} is on no side")));
    }
    Ok(tile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::catalogue;
    use crate::zone::ZoneLike;

    fn single_tile(body: &str) -> Result<TileCatalogue> {
        TileCatalogue::from_ron_str(&format!(
            "TileCatalogue(tiles: [TileDef(id: 1, kind: Start, {body})])"
        ))
    }

    #[test]
    fn test_start_tile_is_resolved() {
        let catalogue = catalogue();
        let start = catalogue.tile(TileId(56)).unwrap();
        assert_eq!(start.kind, TileKind::Start);
        let ids: Vec<ZoneId> = start.zones().iter().map(|zone| zone.id()).collect();
        assert_eq!(
            ids,
            vec![ZoneId(560), ZoneId(561), ZoneId(562), ZoneId(563), ZoneId(568)]
        );
        match &start.w {
            TileSide::River { river, .. } => {
                assert_eq!(river.lake.as_ref().map(|lake| lake.fish_count), Some(1))
            }
            side => panic!("unexpected side {side:?}"),
        }
    }

    #[test]
    fn test_animal_ids() {
        let catalogue = catalogue();
        let tile = catalogue.tile(TileId(6)).unwrap();
        let TileSide::Meadow(meadow) = &tile.n else {
            panic!("expected a meadow");
        };
        let ids: Vec<u32> = meadow.animals.iter().map(|animal| animal.id.0).collect();
        assert_eq!(ids, vec![600, 601, 602]);
        assert_eq!(meadow.special_power, Some(SpecialPower::HuntingTrap));
    }

    #[test]
    fn test_wrong_side_kind() {
        let result = single_tile(
            "zones: [Forest(local: 0)], n: Meadow(0), e: Forest(0), s: Forest(0), w: Forest(0)",
        );
        assert!(matches!(result, Err(Error::Catalogue(_))));
    }

    #[test]
    fn test_duplicate_local_id() {
        let result = single_tile(
            "zones: [Forest(local: 0), Meadow(local: 0)], n: Forest(0), e: Forest(0), s: Forest(0), w: Forest(0)",
        );
        assert!(matches!(result, Err(Error::Catalogue(_))));
    }

    #[test]
    fn test_local_id_out_of_range() {
        let result = single_tile(
            "zones: [Forest(local: 10)], n: Forest(10), e: Forest(10), s: Forest(10), w: Forest(10)",
        );
        assert!(matches!(result, Err(Error::Catalogue(_))));
    }

    #[test]
    fn test_too_many_animals() {
        let animals = vec!["Deer"; AnimalId::MAX_PER_ZONE + 1].join(", ");
        let result = single_tile(&format!(
            "zones: [Meadow(local: 0, animals: [{animals}])], n: Meadow(0), e: Meadow(0), s: Meadow(0), w: Meadow(0)"
        ));
        assert!(matches!(result, Err(Error::Catalogue(_))));
    }

    #[test]
    fn test_unreachable_lake() {
        let result = single_tile(
            "zones: [Forest(local: 0), Lake(local: 8)], n: Forest(0), e: Forest(0), s: Forest(0), w: Forest(0)",
        );
        assert!(matches!(result, Err(Error::Catalogue(_))));
    }

    #[test]
    fn test_unused_zone() {
        let result = single_tile(
            "zones: [Forest(local: 0), Meadow(local: 1)], n: Forest(0), e: Forest(0), s: Forest(0), w: Forest(0)",
        );
        assert!(matches!(result, Err(Error::Catalogue(_))));
    }

    #[test]
    fn test_requires_one_start_tile() {
        let result = TileCatalogue::from_ron_str(
            "TileCatalogue(tiles: [TileDef(id: 1, kind: Normal, zones: [Forest(local: 0)], n: Forest(0), e: Forest(0), s: Forest(0), w: Forest(0))])",
        );
        assert!(matches!(result, Err(Error::Catalogue(_))));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            TileCatalogue::from_ron_str("TileCatalogue(tiles: [)"),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_builtin_catalogue() {
        let catalogue = TileCatalogue::builtin().unwrap();
        assert!(catalogue.tile(TileId(56)).is_some());

        let decks = catalogue.shuffled_decks("partie");
        assert_eq!(decks.deck_size(TileKind::Start), 1);
        assert!(decks.deck_size(TileKind::Normal) > 20);
        assert!(decks.deck_size(TileKind::Menhir) > 0);

        let order = |decks: &TileDecks| decks.top_tile(TileKind::Normal).map(|tile| tile.id);
        assert_eq!(order(&decks), order(&catalogue.shuffled_decks("partie")));

        let powers: BTreeSet<SpecialPower> = catalogue
            .tiles()
            .filter_map(|tile| tile.zones().iter().find_map(|zone| zone.special_power()))
            .collect();
        assert_eq!(powers.len(), 6);
    }
}
