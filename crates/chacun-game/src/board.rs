//! The board: a square grid of placed tiles and the partitions they form

use crate::area::{Area, ZonePartitions};
use crate::error::{Error, Result};
use crate::geometry::{Direction, Pos, Rotation};
use crate::identity::{TileId, ZoneId};
use crate::player::{Occupant, OccupantKind, PlayerColor};
use crate::tile::{PlacedTile, Tile};
use crate::zone::{Animal, Forest, Meadow, River, Water, Zone};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Maximum distance of a tile from the origin along either axis
pub const REACH: i32 = 12;

const WIDTH: usize = (REACH * 2 + 1) as usize;

/// Immutable game board
///
/// Every operation that changes the board returns a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    placed_tiles: Vec<Option<PlacedTile>>,
    ordered_indexes: Vec<usize>,
    partitions: ZonePartitions,
    cancelled_animals: BTreeSet<Animal>,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            placed_tiles: vec![None; WIDTH * WIDTH],
            ordered_indexes: Vec::new(),
            partitions: ZonePartitions::default(),
            cancelled_animals: BTreeSet::new(),
        }
    }
}

fn is_in_board(pos: Pos) -> bool {
    pos.x.abs() <= REACH && pos.y.abs() <= REACH
}

fn index_of(pos: Pos) -> Option<usize> {
    if !is_in_board(pos) {
        return None;
    }
    Some((pos.y + REACH) as usize * WIDTH + (pos.x + REACH) as usize)
}

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered_indexes.is_empty()
    }

    pub fn partitions(&self) -> &ZonePartitions {
        &self.partitions
    }

    pub fn tile_at(&self, pos: Pos) -> Option<&PlacedTile> {
        index_of(pos).and_then(|index| self.placed_tiles[index].as_ref())
    }

    /// Placed tiles in placement order
    pub fn placed_tiles(&self) -> impl Iterator<Item = &PlacedTile> {
        self.ordered_indexes
            .iter()
            .filter_map(|index| self.placed_tiles[*index].as_ref())
    }

    pub fn tile_with_id(&self, id: TileId) -> Result<&PlacedTile> {
        self.placed_tiles()
            .find(|tile| tile.id() == id)
            .ok_or(Error::TileNotFound(id))
    }

    pub fn cancelled_animals(&self) -> &BTreeSet<Animal> {
        &self.cancelled_animals
    }

    pub fn occupants(&self) -> BTreeSet<Occupant> {
        self.placed_tiles()
            .filter_map(|tile| tile.occupant)
            .collect()
    }

    pub fn forest_area(&self, id: ZoneId) -> Result<&Area<Forest>> {
        self.partitions.forests.area_containing(id)
    }

    pub fn meadow_area(&self, id: ZoneId) -> Result<&Area<Meadow>> {
        self.partitions.meadows.area_containing(id)
    }

    pub fn river_area(&self, id: ZoneId) -> Result<&Area<River>> {
        self.partitions.rivers.area_containing(id)
    }

    pub fn river_system_area(&self, id: ZoneId) -> Result<&Area<Water>> {
        self.partitions.river_systems.area_containing(id)
    }

    pub fn meadow_areas(&self) -> &[Area<Meadow>] {
        self.partitions.meadows.areas()
    }

    pub fn river_system_areas(&self) -> &[Area<Water>] {
        self.partitions.river_systems.areas()
    }

    /// Part of a meadow lying on the tile at `pos` and its eight neighbours
    ///
    /// The result keeps the occupants of the whole meadow and has no open connection.
    pub fn adjacent_meadow(&self, pos: Pos, meadow: ZoneId) -> Result<Area<Meadow>> {
        let area = self.meadow_area(meadow)?;
        let mut zones = Vec::new();
        for zone in area.zones() {
            let tile = self.tile_with_id(zone.id.tile_id())?;
            if (tile.pos.x - pos.x).abs() <= 1 && (tile.pos.y - pos.y).abs() <= 1 {
                zones.push(zone.clone());
            }
        }
        Ok(Area::new(zones, area.occupants().to_vec(), 0))
    }

    pub fn occupant_count(&self, player: PlayerColor, kind: OccupantKind) -> u32 {
        self.placed_tiles()
            .filter(|tile| {
                tile.placer == Some(player)
                    && tile.occupant.map(|occupant| occupant.kind) == Some(kind)
            })
            .count() as u32
    }

    /// Empty positions next to at least one placed tile
    pub fn insertion_positions(&self) -> BTreeSet<Pos> {
        self.placed_tiles()
            .flat_map(|tile| Direction::ALL.map(|direction| tile.pos.neighbor(direction)))
            .filter(|pos| is_in_board(*pos) && self.tile_at(*pos).is_none())
            .collect()
    }

    pub fn last_placed_tile(&self) -> Option<&PlacedTile> {
        self.ordered_indexes
            .last()
            .and_then(|index| self.placed_tiles[*index].as_ref())
    }

    pub fn forests_closed_by_last_tile(&self) -> Result<Vec<Area<Forest>>> {
        let mut closed: Vec<Area<Forest>> = Vec::new();
        if let Some(tile) = self.last_placed_tile() {
            for forest in tile.forest_zones() {
                let area = self.forest_area(forest.id)?;
                if area.is_closed() && !closed.contains(area) {
                    closed.push(area.clone());
                }
            }
        }
        Ok(closed)
    }

    pub fn rivers_closed_by_last_tile(&self) -> Result<Vec<Area<River>>> {
        let mut closed: Vec<Area<River>> = Vec::new();
        if let Some(tile) = self.last_placed_tile() {
            for river in tile.river_zones() {
                let area = self.river_area(river.id)?;
                if area.is_closed() && !closed.contains(area) {
                    closed.push(area.clone());
                }
            }
        }
        Ok(closed)
    }

    /// Whether the tile sits on an insertion position and matches every neighbour
    pub fn can_add_tile(&self, tile: &PlacedTile) -> bool {
        self.insertion_positions().contains(&tile.pos)
            && Direction::ALL.iter().all(|direction| {
                match self.tile_at(tile.pos.neighbor(*direction)) {
                    Some(neighbor) => tile
                        .side(*direction)
                        .is_same_kind_as(neighbor.side(direction.opposite())),
                    None => true,
                }
            })
    }

    /// Whether the tile fits somewhere on the board in some rotation
    pub fn could_place_tile(&self, tile: &Arc<Tile>) -> bool {
        self.insertion_positions().into_iter().any(|pos| {
            Rotation::ALL.iter().any(|rotation| {
                self.can_add_tile(&PlacedTile::new(tile.clone(), None, *rotation, pos))
            })
        })
    }

    pub fn with_new_tile(&self, tile: PlacedTile) -> Result<Board> {
        if !(self.is_empty() || self.can_add_tile(&tile)) {
            return Err(Error::IllegalPlacement(tile.pos));
        }
        let index = index_of(tile.pos).ok_or(Error::IllegalPlacement(tile.pos))?;

        let mut builder = self.partitions.builder();
        builder.add_tile(&tile.tile)?;
        for direction in Direction::ALL {
            if let Some(neighbor) = self.tile_at(tile.pos.neighbor(direction)) {
                builder.connect_sides(neighbor.side(direction.opposite()), tile.side(direction))?;
            }
        }

        let mut placed_tiles = self.placed_tiles.clone();
        placed_tiles[index] = Some(tile);
        let mut ordered_indexes = self.ordered_indexes.clone();
        ordered_indexes.push(index);

        Ok(Board {
            placed_tiles,
            ordered_indexes,
            partitions: builder.build(),
            cancelled_animals: self.cancelled_animals.clone(),
        })
    }

    fn placed_index_of_zone(&self, zone_id: ZoneId) -> Result<(usize, &PlacedTile)> {
        let tile = self.tile_with_id(zone_id.tile_id())?;
        let index = index_of(tile.pos).ok_or(Error::TileNotFound(tile.id()))?;
        Ok((index, tile))
    }

    pub fn with_occupant(&self, occupant: Occupant) -> Result<Board> {
        let (index, tile) = self.placed_index_of_zone(occupant.zone_id)?;
        let placer = tile.placer.ok_or(Error::InvalidOccupation {
            kind: occupant.kind,
            zone: occupant.zone_id,
        })?;
        let zone = tile.zone_with_id(occupant.zone_id)?;
        let occupied = tile.with_occupant(occupant)?;

        let mut builder = self.partitions.builder();
        builder.add_initial_occupant(placer, occupant.kind, &zone)?;

        let mut placed_tiles = self.placed_tiles.clone();
        placed_tiles[index] = Some(occupied);
        Ok(Board {
            placed_tiles,
            ordered_indexes: self.ordered_indexes.clone(),
            partitions: builder.build(),
            cancelled_animals: self.cancelled_animals.clone(),
        })
    }

    pub fn without_occupant(&self, occupant: Occupant) -> Result<Board> {
        let (index, tile) = self.placed_index_of_zone(occupant.zone_id)?;
        let placer = tile.placer.ok_or(Error::InvalidOccupation {
            kind: occupant.kind,
            zone: occupant.zone_id,
        })?;
        let zone = tile.zone_with_id(occupant.zone_id)?;

        let mut builder = self.partitions.builder();
        builder.remove_pawn(placer, &zone)?;

        let mut placed_tiles = self.placed_tiles.clone();
        placed_tiles[index] = Some(tile.with_no_occupant());
        Ok(Board {
            placed_tiles,
            ordered_indexes: self.ordered_indexes.clone(),
            partitions: builder.build(),
            cancelled_animals: self.cancelled_animals.clone(),
        })
    }

    /// Remove every pawn from the given forests and rivers
    pub fn without_gatherers_or_fishers_in(
        &self,
        forests: &[Area<Forest>],
        rivers: &[Area<River>],
    ) -> Result<Board> {
        let mut placed_tiles = self.placed_tiles.clone();
        for index in &self.ordered_indexes {
            let Some(tile) = self.placed_tiles[*index].as_ref() else {
                continue;
            };
            let Some(zone_id) = tile.id_of_zone_occupied_by(OccupantKind::Pawn) else {
                continue;
            };
            let cleared = match tile.zone_with_id(zone_id)? {
                Zone::Forest(forest) => forests.contains(self.forest_area(forest.id)?),
                Zone::River(river) => rivers.contains(self.river_area(river.id)?),
                Zone::Meadow(_) | Zone::Lake(_) => false,
            };
            if cleared {
                placed_tiles[*index] = Some(tile.with_no_occupant());
            }
        }

        let mut builder = self.partitions.builder();
        for river in rivers {
            builder.clear_fishers(river)?;
        }
        for forest in forests {
            builder.clear_gatherers(forest)?;
        }

        Ok(Board {
            placed_tiles,
            ordered_indexes: self.ordered_indexes.clone(),
            partitions: builder.build(),
            cancelled_animals: self.cancelled_animals.clone(),
        })
    }

    pub fn with_more_cancelled_animals(&self, animals: impl IntoIterator<Item = Animal>) -> Board {
        let mut cancelled_animals = self.cancelled_animals.clone();
        cancelled_animals.extend(animals);
        Board {
            cancelled_animals,
            ..self.clone()
        }
    }
}
