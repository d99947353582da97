//! Game state and the turn state machine
//!
//! A turn goes through `PlaceTile`, then optionally `RetakePawn` (shaman)
//! and `OccupyTile`. It ends by scoring the forests and rivers closed by
//! the last tile, then either gives the same player a menhir tile or hands
//! a normal tile to the next player. When no normal tile can be placed,
//! the remaining meadows and river systems are scored and the game ends.

use crate::area::Area;
use crate::board::Board;
use crate::deck::TileDecks;
use crate::error::{Error, Result};
use crate::geometry::{Pos, Rotation};
use crate::message::MessageBoard;
use crate::player::{Occupant, OccupantKind, PlayerColor};
use crate::text::TextMaker;
use crate::tile::{PlacedTile, Tile, TileKind};
use crate::zone::{Animal, AnimalKind, Meadow, SpecialPower, Zone};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Minimum number of players in a game
pub const MIN_PLAYER_COUNT: usize = 2;

/// The action the game expects next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NextAction {
    StartGame,
    PlaceTile,
    RetakePawn,
    OccupyTile,
    EndGame,
}

/// Complete, immutable state of a game
///
/// `tile_to_place` is present exactly when the next action is `PlaceTile`.
#[derive(Debug, Clone)]
pub struct GameState {
    players: Vec<PlayerColor>,
    tile_decks: TileDecks,
    tile_to_place: Option<Arc<Tile>>,
    board: Board,
    next_action: NextAction,
    message_board: MessageBoard,
}

impl GameState {
    /// State of a game that has not started: empty board, nothing to place
    pub fn initial(
        players: Vec<PlayerColor>,
        tile_decks: TileDecks,
        text_maker: Arc<dyn TextMaker>,
    ) -> Result<Self> {
        if players.len() < MIN_PLAYER_COUNT {
            return Err(Error::NotEnoughPlayers(players.len()));
        }
        Ok(Self {
            players,
            tile_decks,
            tile_to_place: None,
            board: Board::empty(),
            next_action: NextAction::StartGame,
            message_board: MessageBoard::new(text_maker),
        })
    }

    /// Players in turn order, the current player first
    pub fn players(&self) -> &[PlayerColor] {
        &self.players
    }

    pub fn tile_decks(&self) -> &TileDecks {
        &self.tile_decks
    }

    pub fn tile_to_place(&self) -> Option<&Arc<Tile>> {
        self.tile_to_place.as_ref()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn next_action(&self) -> NextAction {
        self.next_action
    }

    pub fn message_board(&self) -> &MessageBoard {
        &self.message_board
    }

    /// Player whose turn it is, none before the start and after the end
    pub fn current_player(&self) -> Option<PlayerColor> {
        match self.next_action {
            NextAction::StartGame | NextAction::EndGame => None,
            _ => self.players.first().copied(),
        }
    }

    pub fn free_occupants_count(&self, player: PlayerColor, kind: OccupantKind) -> u32 {
        kind.count()
            .saturating_sub(self.board.occupant_count(player, kind))
    }

    fn expect_action(&self, expected: NextAction) -> Result<()> {
        if self.next_action != expected {
            return Err(Error::UnexpectedAction {
                expected,
                actual: self.next_action,
            });
        }
        Ok(())
    }

    fn playing(&self) -> Result<PlayerColor> {
        self.current_player()
            .ok_or_else(|| Error::IllegalAction("no player is playing".to_string()))
    }

    /// Occupants the current player may put on the last placed tile
    ///
    /// Only occupants the player still has in stock and whose area is
    /// unoccupied are kept.
    pub fn last_tile_potential_occupants(&self) -> Result<BTreeSet<Occupant>> {
        let tile = self
            .board
            .last_placed_tile()
            .ok_or_else(|| Error::IllegalAction("no tile has been placed".to_string()))?;
        let Some(player) = self.current_player() else {
            return Ok(BTreeSet::new());
        };

        let mut occupants = BTreeSet::new();
        for occupant in tile.potential_occupants() {
            if self.free_occupants_count(player, occupant.kind) == 0 {
                continue;
            }
            let occupied = match tile.zone_with_id(occupant.zone_id)? {
                Zone::Forest(forest) => self.board.forest_area(forest.id)?.is_occupied(),
                Zone::Meadow(meadow) => self.board.meadow_area(meadow.id)?.is_occupied(),
                Zone::River(river) if occupant.kind == OccupantKind::Pawn => {
                    self.board.river_area(river.id)?.is_occupied()
                }
                Zone::River(_) | Zone::Lake(_) => self
                    .board
                    .river_system_area(occupant.zone_id)?
                    .is_occupied(),
            };
            if !occupied {
                occupants.insert(occupant);
            }
        }
        Ok(occupants)
    }

    /// Place the start tile at the origin and draw the first normal tile
    pub fn with_starting_tile_placed(&self) -> Result<Self> {
        self.expect_action(NextAction::StartGame)?;

        let start = self
            .tile_decks
            .top_tile(TileKind::Start)
            .cloned()
            .ok_or(Error::EmptyDeck(TileKind::Start))?;
        let decks = self.tile_decks.with_top_tile_drawn(TileKind::Start)?;
        let board = self
            .board
            .with_new_tile(PlacedTile::new(start, None, Rotation::None, Pos::ORIGIN))?;

        let tile_to_place = decks
            .top_tile(TileKind::Normal)
            .cloned()
            .ok_or(Error::EmptyDeck(TileKind::Normal))?;
        let decks = decks.with_top_tile_drawn(TileKind::Normal)?;

        Ok(Self {
            players: self.players.clone(),
            tile_decks: decks,
            tile_to_place: Some(tile_to_place),
            board,
            next_action: NextAction::PlaceTile,
            message_board: self.message_board.clone(),
        })
    }

    /// Place the tile to place and apply its special power
    pub fn with_placed_tile(&self, tile: PlacedTile) -> Result<Self> {
        self.expect_action(NextAction::PlaceTile)?;
        if tile.occupant.is_some() {
            return Err(Error::TileAlreadyOccupied(tile.id()));
        }
        if self.tile_to_place.as_ref().map(|t| t.id) != Some(tile.id()) {
            return Err(Error::IllegalAction(format!(
                "tile {} is not the tile to place",
                tile.id()
            )));
        }
        let player = self.playing()?;

        let mut board = self.board.with_new_tile(tile.clone())?;
        let mut message_board = self.message_board.clone();

        match tile.special_power_zone() {
            Some(Zone::Lake(lake)) if lake.special_power == Some(SpecialPower::Logboat) => {
                let river_system = board.river_system_area(lake.id)?;
                message_board = message_board.with_scored_logboat(player, river_system);
            }
            Some(Zone::Meadow(meadow)) if meadow.special_power == Some(SpecialPower::Shaman) => {
                if board.occupant_count(player, OccupantKind::Pawn) > 0 {
                    return Ok(Self {
                        players: self.players.clone(),
                        tile_decks: self.tile_decks.clone(),
                        tile_to_place: None,
                        board,
                        next_action: NextAction::RetakePawn,
                        message_board,
                    });
                }
            }
            Some(Zone::Meadow(meadow))
                if meadow.special_power == Some(SpecialPower::HuntingTrap) =>
            {
                let adjacent = board.adjacent_meadow(tile.pos, meadow.id)?;
                let mut cancelled = board.cancelled_animals().clone();
                cancelled.extend(deer_to_cancel(&adjacent, board.cancelled_animals()));
                message_board = message_board.with_scored_hunting_trap(player, &adjacent, &cancelled);
                let remaining = adjacent.animals(board.cancelled_animals());
                board = board.with_more_cancelled_animals(remaining);
            }
            _ => {}
        }

        Self {
            players: self.players.clone(),
            tile_decks: self.tile_decks.clone(),
            tile_to_place: None,
            board,
            next_action: NextAction::OccupyTile,
            message_board,
        }
        .with_turn_finished_if_occupation_impossible()
    }

    /// Take back a pawn after placing a shaman, or none
    pub fn with_occupant_removed(&self, occupant: Option<Occupant>) -> Result<Self> {
        self.expect_action(NextAction::RetakePawn)?;
        let board = match occupant {
            Some(occupant) if occupant.kind != OccupantKind::Pawn => {
                return Err(Error::IllegalAction("only pawns can be taken back".to_string()))
            }
            Some(occupant) => self.board.without_occupant(occupant)?,
            None => self.board.clone(),
        };
        Self {
            players: self.players.clone(),
            tile_decks: self.tile_decks.clone(),
            tile_to_place: None,
            board,
            next_action: NextAction::OccupyTile,
            message_board: self.message_board.clone(),
        }
        .with_turn_finished_if_occupation_impossible()
    }

    /// Occupy the last placed tile, or not, and end the turn
    pub fn with_new_occupant(&self, occupant: Option<Occupant>) -> Result<Self> {
        self.expect_action(NextAction::OccupyTile)?;
        let board = match occupant {
            Some(occupant) => self.board.with_occupant(occupant)?,
            None => self.board.clone(),
        };
        Self {
            players: self.players.clone(),
            tile_decks: self.tile_decks.clone(),
            tile_to_place: None,
            board,
            next_action: NextAction::OccupyTile,
            message_board: self.message_board.clone(),
        }
        .with_turn_finished()
    }

    fn with_turn_finished_if_occupation_impossible(self) -> Result<Self> {
        if self.last_tile_potential_occupants()?.is_empty() {
            self.with_turn_finished()
        } else {
            Ok(self)
        }
    }

    fn with_turn_finished(self) -> Result<Self> {
        let player = self.playing()?;
        let last_kind = self
            .board
            .last_placed_tile()
            .map(PlacedTile::kind)
            .ok_or_else(|| Error::IllegalAction("no tile has been placed".to_string()))?;

        let mut message_board = self.message_board.clone();
        let closed_forests = self.board.forests_closed_by_last_tile()?;
        let mut menhir_forest = None;
        for forest in &closed_forests {
            if forest.has_menhir() {
                menhir_forest = Some(forest);
            }
            message_board = message_board.with_scored_forest(forest);
        }
        let closed_rivers = self.board.rivers_closed_by_last_tile()?;
        for river in &closed_rivers {
            message_board = message_board.with_scored_river(river);
        }
        let board = self
            .board
            .without_gatherers_or_fishers_in(&closed_forests, &closed_rivers)?;

        let mut decks = self.tile_decks.clone();
        if let (Some(forest), TileKind::Normal) = (menhir_forest, last_kind) {
            decks = decks.with_top_tile_drawn_until(TileKind::Menhir, |tile| {
                board.could_place_tile(tile)
            });
            if let Some(menhir) = decks.top_tile(TileKind::Menhir).cloned() {
                message_board = message_board.with_closed_forest_with_menhir(player, forest);
                return Ok(Self {
                    players: self.players,
                    tile_decks: decks.with_top_tile_drawn(TileKind::Menhir)?,
                    tile_to_place: Some(menhir),
                    board,
                    next_action: NextAction::PlaceTile,
                    message_board,
                });
            }
        }

        decks = decks.with_top_tile_drawn_until(TileKind::Normal, |tile| board.could_place_tile(tile));
        match decks.top_tile(TileKind::Normal).cloned() {
            Some(next) => {
                let mut players = self.players;
                players.rotate_left(1);
                Ok(Self {
                    players,
                    tile_decks: decks.with_top_tile_drawn(TileKind::Normal)?,
                    tile_to_place: Some(next),
                    board,
                    next_action: NextAction::PlaceTile,
                    message_board,
                })
            }
            None => Self {
                players: self.players,
                tile_decks: decks,
                tile_to_place: None,
                board,
                next_action: NextAction::EndGame,
                message_board,
            }
            .with_final_points_counted(),
        }
    }

    fn with_final_points_counted(self) -> Result<Self> {
        let mut board = self.board.clone();
        let mut message_board = self.message_board.clone();

        let meadows: Vec<Area<Meadow>> = board.meadow_areas().to_vec();
        for meadow in &meadows {
            let has_wild_fire = meadow
                .zone_with_special_power(SpecialPower::WildFire)
                .is_some();
            match meadow.zone_with_special_power(SpecialPower::PitTrap) {
                Some(pit_trap) => {
                    let pos = board.tile_with_id(pit_trap.id.tile_id())?.pos;
                    if !has_wild_fire {
                        let deer = deer_to_cancel_with_pit_trap(&board, pit_trap)?;
                        board = board.with_more_cancelled_animals(deer);
                    }
                    let adjacent = board.adjacent_meadow(pos, pit_trap.id)?;
                    message_board =
                        message_board.with_scored_pit_trap(&adjacent, board.cancelled_animals());
                }
                None if !has_wild_fire => {
                    let deer = deer_to_cancel(meadow, board.cancelled_animals());
                    board = board.with_more_cancelled_animals(deer);
                }
                None => {}
            }
            message_board = message_board.with_scored_meadow(meadow, board.cancelled_animals());
        }

        for river_system in board.river_system_areas() {
            message_board = message_board.with_scored_river_system(river_system);
            if river_system
                .zone_with_special_power(SpecialPower::Raft)
                .is_some()
            {
                message_board = message_board.with_scored_raft(river_system);
            }
        }

        let mut totals: BTreeMap<PlayerColor, u32> =
            self.players.iter().map(|player| (*player, 0)).collect();
        totals.extend(message_board.points());
        let max = totals.values().copied().max().unwrap_or(0);
        let winners: BTreeSet<PlayerColor> = totals
            .into_iter()
            .filter(|(_, points)| *points == max)
            .map(|(player, _)| player)
            .collect();
        message_board = message_board.with_winners(&winners, max);

        Ok(Self {
            players: self.players,
            tile_decks: self.tile_decks,
            tile_to_place: None,
            board,
            next_action: NextAction::EndGame,
            message_board,
        })
    }
}

fn is_deer(animal: &Animal) -> bool {
    animal.kind == AnimalKind::Deer
}

fn tiger_count(animals: &BTreeSet<Animal>) -> usize {
    animals
        .iter()
        .filter(|animal| animal.kind == AnimalKind::Tiger)
        .count()
}

/// Deer eaten by the tigers of the meadow, one per tiger
fn deer_to_cancel(meadow: &Area<Meadow>, cancelled: &BTreeSet<Animal>) -> BTreeSet<Animal> {
    let animals = meadow.animals(cancelled);
    let tigers = tiger_count(&animals);
    animals.into_iter().filter(is_deer).take(tigers).collect()
}

/// Deer eaten by tigers in a meadow with a pit trap, furthest from the trap first
fn deer_to_cancel_with_pit_trap(board: &Board, pit_trap: &Meadow) -> Result<BTreeSet<Animal>> {
    let cancelled = board.cancelled_animals();
    let animals = board.meadow_area(pit_trap.id)?.animals(cancelled);
    let pos = board.tile_with_id(pit_trap.id.tile_id())?.pos;
    let adjacent: BTreeSet<Animal> = board
        .adjacent_meadow(pos, pit_trap.id)?
        .animals(cancelled)
        .into_iter()
        .filter(is_deer)
        .collect();
    let outside = animals
        .iter()
        .filter(|animal| is_deer(animal) && !adjacent.contains(animal));

    Ok(outside
        .chain(adjacent.iter())
        .take(tiger_count(&animals))
        .copied()
        .collect())
}
