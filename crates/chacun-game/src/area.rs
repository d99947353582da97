//! Areas of connected zones and the partitions grouping them
//!
//! An area is a set of zones of the same type that are connected across
//! tile sides, together with the players occupying it and the number of
//! sides still open. Partitions are rebuilt through builders, so every
//! board keeps its own immutable copy.

use crate::error::{Error, Result};
use crate::identity::{TileId, ZoneId};
use crate::player::{OccupantKind, PlayerColor};
use crate::tile::{Tile, TileSide};
use crate::zone::{Animal, Forest, ForestKind, Meadow, River, SpecialPower, Water, Zone, ZoneLike};
use std::collections::{BTreeMap, BTreeSet};

/// Connected zones of the same type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Area<Z> {
    zones: Vec<Z>,
    occupants: Vec<PlayerColor>,
    open_connections: u32,
}

impl<Z: ZoneLike> Area<Z> {
    /// Create an area; zones are deduplicated and sorted by id, occupants sorted by colour
    pub fn new(
        zones: impl IntoIterator<Item = Z>,
        mut occupants: Vec<PlayerColor>,
        open_connections: u32,
    ) -> Self {
        let mut zones: Vec<Z> = zones.into_iter().collect();
        zones.sort_by_key(|zone| zone.id());
        zones.dedup_by_key(|zone| zone.id());
        occupants.sort();
        Self {
            zones,
            occupants,
            open_connections,
        }
    }

    pub fn zones(&self) -> &[Z] {
        &self.zones
    }

    pub fn occupants(&self) -> &[PlayerColor] {
        &self.occupants
    }

    pub fn open_connections(&self) -> u32 {
        self.open_connections
    }

    pub fn contains(&self, id: ZoneId) -> bool {
        self.zones.iter().any(|zone| zone.id() == id)
    }

    pub fn is_closed(&self) -> bool {
        self.open_connections == 0
    }

    pub fn is_occupied(&self) -> bool {
        !self.occupants.is_empty()
    }

    /// Players with the highest number of occupants in the area
    pub fn majority_occupants(&self) -> BTreeSet<PlayerColor> {
        let mut counts: BTreeMap<PlayerColor, usize> = BTreeMap::new();
        for occupant in &self.occupants {
            *counts.entry(*occupant).or_default() += 1;
        }
        let max = counts.values().copied().max().unwrap_or(0);
        counts
            .into_iter()
            .filter(|(_, count)| *count == max)
            .map(|(color, _)| color)
            .collect()
    }

    /// Area resulting from connecting one open side of this area to one of `other`
    ///
    /// Connecting an area to itself closes two of its connections. Fails
    /// when the areas lack the two open sides being joined.
    pub fn connect_to(&self, other: &Area<Z>) -> Result<Area<Z>> {
        let same = self == other;
        let zones = self.zones.iter().chain(other.zones.iter()).cloned();
        let mut occupants = self.occupants.clone();
        let open = if same {
            self.open_connections
        } else {
            occupants.extend_from_slice(&other.occupants);
            self.open_connections + other.open_connections
        };
        let open_connections = open.checked_sub(2).ok_or(Error::NoOpenConnection)?;
        Ok(Area::new(zones, occupants, open_connections))
    }

    pub fn zone_with_special_power(&self, power: SpecialPower) -> Option<&Z> {
        self.zones
            .iter()
            .find(|zone| zone.special_power() == Some(power))
    }

    pub fn with_initial_occupant(&self, occupant: PlayerColor) -> Result<Self> {
        if self.is_occupied() {
            let id = self.zones.first().map(|zone| zone.id()).unwrap_or(ZoneId(0));
            return Err(Error::AreaAlreadyOccupied(id));
        }
        Ok(Area::new(
            self.zones.clone(),
            vec![occupant],
            self.open_connections,
        ))
    }

    pub fn without_occupant(&self, occupant: PlayerColor) -> Result<Self> {
        let index = self
            .occupants
            .iter()
            .position(|color| *color == occupant)
            .ok_or(Error::OccupantNotFound(occupant))?;
        let mut occupants = self.occupants.clone();
        occupants.remove(index);
        Ok(Area::new(self.zones.clone(), occupants, self.open_connections))
    }

    pub fn without_occupants(&self) -> Self {
        Area::new(self.zones.clone(), Vec::new(), self.open_connections)
    }

    pub fn tile_ids(&self) -> BTreeSet<TileId> {
        self.zones.iter().map(|zone| zone.tile_id()).collect()
    }
}

impl Area<Forest> {
    pub fn has_menhir(&self) -> bool {
        self.zones
            .iter()
            .any(|zone| zone.kind == ForestKind::WithMenhir)
    }

    pub fn mushroom_group_count(&self) -> u32 {
        self.zones
            .iter()
            .filter(|zone| zone.kind == ForestKind::WithMushrooms)
            .count() as u32
    }
}

impl Area<Meadow> {
    /// Animals of the meadow that have not been cancelled
    pub fn animals(&self, cancelled: &BTreeSet<Animal>) -> BTreeSet<Animal> {
        self.zones
            .iter()
            .flat_map(|zone| zone.animals.iter().copied())
            .filter(|animal| !cancelled.contains(animal))
            .collect()
    }
}

impl Area<River> {
    /// Fish in the rivers plus, once each, the fish of the lakes at their ends
    pub fn fish_count(&self) -> u32 {
        let mut lakes = BTreeSet::new();
        self.zones
            .iter()
            .map(|river| match &river.lake {
                Some(lake) if lakes.insert(lake.id) => river.fish_count + lake.fish_count,
                _ => river.fish_count,
            })
            .sum()
    }
}

impl Area<Water> {
    pub fn lake_count(&self) -> u32 {
        self.zones
            .iter()
            .filter(|zone| matches!(zone, Water::Lake(_)))
            .count() as u32
    }

    pub fn fish_count(&self) -> u32 {
        self.zones.iter().map(Water::fish_count).sum()
    }
}

/// Set of disjoint areas of the same zone type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZonePartition<Z> {
    areas: Vec<Area<Z>>,
}

impl<Z> Default for ZonePartition<Z> {
    fn default() -> Self {
        Self { areas: Vec::new() }
    }
}

impl<Z: ZoneLike> ZonePartition<Z> {
    pub fn new(areas: Vec<Area<Z>>) -> Self {
        Self { areas }
    }

    pub fn areas(&self) -> &[Area<Z>] {
        &self.areas
    }

    pub fn area_containing(&self, id: ZoneId) -> Result<&Area<Z>> {
        self.areas
            .iter()
            .find(|area| area.contains(id))
            .ok_or(Error::ZoneNotFound(id))
    }

    pub fn builder(&self) -> ZonePartitionBuilder<Z> {
        ZonePartitionBuilder {
            areas: self.areas.clone(),
        }
    }
}

/// Mutable view of a partition used while a board is being derived
#[derive(Debug, Clone)]
pub struct ZonePartitionBuilder<Z> {
    areas: Vec<Area<Z>>,
}

impl<Z: ZoneLike> ZonePartitionBuilder<Z> {
    fn index_of(&self, id: ZoneId) -> Result<usize> {
        self.areas
            .iter()
            .position(|area| area.contains(id))
            .ok_or(Error::ZoneNotFound(id))
    }

    pub fn add_singleton(&mut self, zone: Z, open_connections: u32) {
        self.areas
            .push(Area::new([zone], Vec::new(), open_connections));
    }

    pub fn add_initial_occupant(&mut self, id: ZoneId, color: PlayerColor) -> Result<()> {
        let index = self.index_of(id)?;
        self.areas[index] = self.areas[index]
            .with_initial_occupant(color)
            .map_err(|_| Error::AreaAlreadyOccupied(id))?;
        Ok(())
    }

    pub fn remove_occupant(&mut self, id: ZoneId, color: PlayerColor) -> Result<()> {
        let index = self.index_of(id)?;
        self.areas[index] = self.areas[index].without_occupant(color)?;
        Ok(())
    }

    pub fn remove_all_occupants_of(&mut self, area: &Area<Z>) -> Result<()> {
        let index = self
            .areas
            .iter()
            .position(|candidate| candidate == area)
            .ok_or(Error::AreaNotFound)?;
        self.areas[index] = self.areas[index].without_occupants();
        Ok(())
    }

    /// Merge the areas containing the two zones
    pub fn union(&mut self, first: ZoneId, second: ZoneId) -> Result<()> {
        let i = self.index_of(first)?;
        let j = self.index_of(second)?;
        if i == j {
            self.areas[i] = self.areas[i].connect_to(&self.areas[i])?;
            return Ok(());
        }
        let merged = self.areas[i].connect_to(&self.areas[j])?;
        self.areas[i] = merged;
        self.areas.remove(j);
        Ok(())
    }

    pub fn build(self) -> ZonePartition<Z> {
        ZonePartition::new(self.areas)
    }
}

/// The four partitions tracked by a board
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZonePartitions {
    pub forests: ZonePartition<Forest>,
    pub meadows: ZonePartition<Meadow>,
    pub rivers: ZonePartition<River>,
    pub river_systems: ZonePartition<Water>,
}

impl ZonePartitions {
    pub fn builder(&self) -> ZonePartitionsBuilder {
        ZonePartitionsBuilder {
            forests: self.forests.builder(),
            meadows: self.meadows.builder(),
            rivers: self.rivers.builder(),
            river_systems: self.river_systems.builder(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ZonePartitionsBuilder {
    forests: ZonePartitionBuilder<Forest>,
    meadows: ZonePartitionBuilder<Meadow>,
    rivers: ZonePartitionBuilder<River>,
    river_systems: ZonePartitionBuilder<Water>,
}

impl ZonePartitionsBuilder {
    /// Add every zone of a new tile as its own area
    pub fn add_tile(&mut self, tile: &Tile) -> Result<()> {
        let mut open = [0u32; 10];
        for side in tile.sides() {
            for zone in side.zones() {
                open[usize::from(zone.local_id())] += 1;
                if let Zone::River(River {
                    lake: Some(lake), ..
                }) = &zone
                {
                    open[usize::from(lake.local_id())] += 1;
                    open[usize::from(zone.local_id())] += 1;
                }
            }
        }

        for zone in tile.zones() {
            let count = open[usize::from(zone.local_id())];
            match zone {
                Zone::Forest(forest) => self.forests.add_singleton(forest, count),
                Zone::Meadow(meadow) => self.meadows.add_singleton(meadow, count),
                Zone::River(river) => {
                    // The link to the lake only counts in the river system.
                    let river_count = if river.has_lake() { count - 1 } else { count };
                    self.rivers.add_singleton(river.clone(), river_count);
                    self.river_systems.add_singleton(Water::River(river), count);
                }
                Zone::Lake(lake) => self.river_systems.add_singleton(Water::Lake(lake), count),
            }
        }

        for zone in tile.zones() {
            if let Zone::River(River {
                id,
                lake: Some(lake),
                ..
            }) = zone
            {
                self.river_systems.union(id, lake.id)?;
            }
        }
        Ok(())
    }

    /// Connect two sides facing each other
    pub fn connect_sides(&mut self, first: &TileSide, second: &TileSide) -> Result<()> {
        match (first, second) {
            (TileSide::Meadow(m1), TileSide::Meadow(m2)) => self.meadows.union(m1.id, m2.id),
            (TileSide::Forest(f1), TileSide::Forest(f2)) => self.forests.union(f1.id, f2.id),
            (
                TileSide::River {
                    meadow1: m1,
                    river: r1,
                    meadow2: m2,
                },
                TileSide::River {
                    meadow1: m3,
                    river: r2,
                    meadow2: m4,
                },
            ) => {
                self.rivers.union(r1.id, r2.id)?;
                self.river_systems.union(r1.id, r2.id)?;
                self.meadows.union(m1.id, m4.id)?;
                self.meadows.union(m2.id, m3.id)
            }
            _ => Err(Error::MismatchedSides),
        }
    }

    pub fn add_initial_occupant(
        &mut self,
        color: PlayerColor,
        kind: OccupantKind,
        zone: &Zone,
    ) -> Result<()> {
        match (zone, kind) {
            (Zone::Meadow(meadow), OccupantKind::Pawn) => {
                self.meadows.add_initial_occupant(meadow.id, color)
            }
            (Zone::Forest(forest), OccupantKind::Pawn) => {
                self.forests.add_initial_occupant(forest.id, color)
            }
            (Zone::River(river), OccupantKind::Pawn) => {
                self.rivers.add_initial_occupant(river.id, color)
            }
            (Zone::River(_) | Zone::Lake(_), OccupantKind::Hut) => {
                self.river_systems.add_initial_occupant(zone.id(), color)
            }
            _ => Err(Error::InvalidOccupation {
                kind,
                zone: zone.id(),
            }),
        }
    }

    pub fn remove_pawn(&mut self, color: PlayerColor, zone: &Zone) -> Result<()> {
        match zone {
            Zone::Meadow(meadow) => self.meadows.remove_occupant(meadow.id, color),
            Zone::Forest(forest) => self.forests.remove_occupant(forest.id, color),
            Zone::River(river) => self.rivers.remove_occupant(river.id, color),
            Zone::Lake(lake) => Err(Error::InvalidOccupation {
                kind: OccupantKind::Pawn,
                zone: lake.id,
            }),
        }
    }

    pub fn clear_gatherers(&mut self, forest: &Area<Forest>) -> Result<()> {
        self.forests.remove_all_occupants_of(forest)
    }

    pub fn clear_fishers(&mut self, river: &Area<River>) -> Result<()> {
        self.rivers.remove_all_occupants_of(river)
    }

    pub fn build(self) -> ZonePartitions {
        ZonePartitions {
            forests: self.forests.build(),
            meadows: self.meadows.build(),
            rivers: self.rivers.build(),
            river_systems: self.river_systems.build(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::tests::start_tile;
    use crate::zone::Lake;

    fn forest(id: u32, kind: ForestKind) -> Forest {
        Forest { id: ZoneId(id), kind }
    }

    #[test]
    fn test_majority_occupants() {
        let area = Area::new(
            [forest(10, ForestKind::Plain)],
            vec![
                PlayerColor::Blue,
                PlayerColor::Red,
                PlayerColor::Blue,
                PlayerColor::Red,
                PlayerColor::Green,
            ],
            0,
        );
        let majority: Vec<_> = area.majority_occupants().into_iter().collect();
        assert_eq!(majority, vec![PlayerColor::Red, PlayerColor::Blue]);
        assert_eq!(area.occupants()[0], PlayerColor::Red);
    }

    #[test]
    fn test_connect_to() {
        let a = Area::new([forest(10, ForestKind::Plain)], vec![PlayerColor::Red], 2);
        let b = Area::new(
            [forest(20, ForestKind::WithMenhir)],
            vec![PlayerColor::Blue],
            3,
        );
        let joined = a.connect_to(&b).unwrap();
        assert_eq!(joined.zones().len(), 2);
        assert_eq!(joined.occupants(), &[PlayerColor::Red, PlayerColor::Blue]);
        assert_eq!(joined.open_connections(), 3);
        assert!(joined.has_menhir());

        let looped = a.connect_to(&a).unwrap();
        assert_eq!(looped.occupants(), &[PlayerColor::Red]);
        assert!(looped.is_closed());
    }

    #[test]
    fn test_connect_last_openings_closes() {
        let a = Area::new(
            [forest(561, ForestKind::WithMenhir), forest(30, ForestKind::Plain)],
            vec![PlayerColor::Red],
            1,
        );
        let b = Area::new([forest(40, ForestKind::Plain)], vec![], 1);
        let closed = a.connect_to(&b).unwrap();
        assert_eq!(closed.open_connections(), 0);
        assert!(closed.is_closed());
        assert_eq!(closed.zones().len(), 3);

        // Nothing left to connect.
        assert!(closed.connect_to(&closed).is_err());
        assert!(b.connect_to(&b).is_err());
    }

    #[test]
    fn test_occupant_changes() {
        let area = Area::new([forest(10, ForestKind::WithMushrooms)], vec![], 1);
        let occupied = area.with_initial_occupant(PlayerColor::Green).unwrap();
        assert!(occupied.is_occupied());
        assert!(occupied.with_initial_occupant(PlayerColor::Red).is_err());
        assert!(occupied.without_occupant(PlayerColor::Red).is_err());
        assert!(!occupied
            .without_occupant(PlayerColor::Green)
            .unwrap()
            .is_occupied());
        assert_eq!(area.mushroom_group_count(), 1);
    }

    #[test]
    fn test_river_fish_counts_lake_once() {
        let lake = Lake {
            id: ZoneId(18),
            fish_count: 2,
            special_power: None,
        };
        let r1 = River {
            id: ZoneId(11),
            fish_count: 1,
            lake: Some(lake.clone()),
        };
        let r2 = River {
            id: ZoneId(12),
            fish_count: 3,
            lake: Some(lake.clone()),
        };
        let rivers = Area::new([r1.clone(), r2.clone()], vec![], 0);
        assert_eq!(rivers.fish_count(), 6);

        let system = Area::new(
            [Water::River(r1), Water::River(r2), Water::Lake(lake)],
            vec![],
            0,
        );
        assert_eq!(system.lake_count(), 1);
        assert_eq!(system.fish_count(), 6);
    }

    #[test]
    fn test_add_start_tile() {
        let mut builder = ZonePartitions::default().builder();
        builder.add_tile(&start_tile()).unwrap();
        let partitions = builder.build();

        let meadow = partitions.meadows.area_containing(ZoneId(560)).unwrap();
        assert_eq!(meadow.open_connections(), 2);
        let meadow = partitions.meadows.area_containing(ZoneId(562)).unwrap();
        assert_eq!(meadow.open_connections(), 1);
        let forest = partitions.forests.area_containing(ZoneId(561)).unwrap();
        assert_eq!(forest.open_connections(), 2);
        let river = partitions.rivers.area_containing(ZoneId(563)).unwrap();
        assert_eq!(river.open_connections(), 1);
        let system = partitions.river_systems.area_containing(ZoneId(568)).unwrap();
        assert_eq!(system.open_connections(), 1);
        assert!(system.contains(ZoneId(563)));
    }

    #[test]
    fn test_connect_mismatched_sides() {
        let tile = start_tile();
        let mut builder = ZonePartitions::default().builder();
        builder.add_tile(&tile).unwrap();
        assert!(matches!(
            builder.connect_sides(&tile.n, &tile.e),
            Err(Error::MismatchedSides)
        ));
    }

    #[test]
    fn test_occupy_and_clear() {
        let tile = start_tile();
        let mut builder = ZonePartitions::default().builder();
        builder.add_tile(&tile).unwrap();
        let forest_zone = tile.e.zones().remove(0);
        builder
            .add_initial_occupant(PlayerColor::Red, OccupantKind::Pawn, &forest_zone)
            .unwrap();
        assert!(builder
            .add_initial_occupant(PlayerColor::Red, OccupantKind::Hut, &forest_zone)
            .is_err());
        let partitions = builder.build();
        let area = partitions
            .forests
            .area_containing(ZoneId(561))
            .unwrap()
            .clone();
        assert!(area.is_occupied());

        let mut builder = partitions.builder();
        builder.clear_gatherers(&area).unwrap();
        let cleared = builder.build();
        assert!(!cleared
            .forests
            .area_containing(ZoneId(561))
            .unwrap()
            .is_occupied());
    }
}
