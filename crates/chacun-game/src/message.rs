//! Message board: the scoring history of a game

use crate::area::Area;
use crate::identity::TileId;
use crate::player::PlayerColor;
use crate::points;
use crate::text::TextMaker;
use crate::zone::{Animal, AnimalKind, Forest, Meadow, River, Water};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// One entry of the message board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub points: u32,
    pub scorers: BTreeSet<PlayerColor>,
    pub tile_ids: BTreeSet<TileId>,
}

/// Immutable list of messages; each scoring event returns a new board
#[derive(Debug, Clone)]
pub struct MessageBoard {
    text_maker: Arc<dyn TextMaker>,
    messages: Vec<Message>,
}

#[derive(Clone, Copy)]
enum MeadowScoring {
    HuntingTrap(PlayerColor),
    PitTrap,
    Meadow,
}

fn count_by_kind(animals: &BTreeSet<Animal>) -> BTreeMap<AnimalKind, u32> {
    let mut counts = BTreeMap::new();
    for animal in animals {
        *counts.entry(animal.kind).or_insert(0) += 1;
    }
    counts
}

fn meadow_points(counts: &BTreeMap<AnimalKind, u32>) -> u32 {
    let count = |kind| counts.get(&kind).copied().unwrap_or(0);
    points::for_meadow(
        count(AnimalKind::Mammoth),
        count(AnimalKind::Aurochs),
        count(AnimalKind::Deer),
    )
}

impl MessageBoard {
    pub fn new(text_maker: Arc<dyn TextMaker>) -> Self {
        Self {
            text_maker,
            messages: Vec::new(),
        }
    }

    pub fn text_maker(&self) -> &dyn TextMaker {
        self.text_maker.as_ref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    fn with_new_message(
        &self,
        text: String,
        points: u32,
        scorers: BTreeSet<PlayerColor>,
        tile_ids: BTreeSet<TileId>,
    ) -> Self {
        let mut messages = self.messages.clone();
        messages.push(Message {
            text,
            points,
            scorers,
            tile_ids,
        });
        Self {
            text_maker: self.text_maker.clone(),
            messages,
        }
    }

    /// Total points per player, for players who scored at least once
    pub fn points(&self) -> BTreeMap<PlayerColor, u32> {
        let mut totals = BTreeMap::new();
        for message in &self.messages {
            for scorer in &message.scorers {
                *totals.entry(*scorer).or_insert(0) += message.points;
            }
        }
        totals
    }

    fn with_scored_meadow_kind(
        &self,
        scoring: MeadowScoring,
        meadow: &Area<Meadow>,
        cancelled: &BTreeSet<Animal>,
    ) -> Self {
        let counts = count_by_kind(&meadow.animals(cancelled));
        let points = meadow_points(&counts);
        if points == 0 {
            return self.clone();
        }
        match scoring {
            MeadowScoring::HuntingTrap(placer) => self.with_new_message(
                self.text_maker
                    .player_scored_hunting_trap(placer, points, &counts),
                points,
                BTreeSet::from([placer]),
                meadow.tile_ids(),
            ),
            MeadowScoring::PitTrap | MeadowScoring::Meadow => {
                if !meadow.is_occupied() {
                    return self.clone();
                }
                let scorers = meadow.majority_occupants();
                let text = if matches!(scoring, MeadowScoring::PitTrap) {
                    self.text_maker
                        .players_scored_pit_trap(&scorers, points, &counts)
                } else {
                    self.text_maker
                        .players_scored_meadow(&scorers, points, &counts)
                };
                self.with_new_message(text, points, scorers, meadow.tile_ids())
            }
        }
    }

    pub fn with_scored_forest(&self, forest: &Area<Forest>) -> Self {
        if !forest.is_occupied() {
            return self.clone();
        }
        let tile_count = forest.tile_ids().len() as u32;
        let mushrooms = forest.mushroom_group_count();
        let points = points::for_closed_forest(tile_count, mushrooms);
        let scorers = forest.majority_occupants();
        self.with_new_message(
            self.text_maker
                .players_scored_forest(&scorers, points, mushrooms, tile_count),
            points,
            scorers,
            forest.tile_ids(),
        )
    }

    pub fn with_closed_forest_with_menhir(
        &self,
        player: PlayerColor,
        forest: &Area<Forest>,
    ) -> Self {
        self.with_new_message(
            self.text_maker.player_closed_forest_with_menhir(player),
            0,
            BTreeSet::new(),
            forest.tile_ids(),
        )
    }

    pub fn with_scored_river(&self, river: &Area<River>) -> Self {
        if !river.is_occupied() {
            return self.clone();
        }
        let tile_count = river.tile_ids().len() as u32;
        let fish = river.fish_count();
        let points = points::for_closed_river(tile_count, fish);
        let scorers = river.majority_occupants();
        self.with_new_message(
            self.text_maker
                .players_scored_river(&scorers, points, fish, tile_count),
            points,
            scorers,
            river.tile_ids(),
        )
    }

    pub fn with_scored_logboat(&self, scorer: PlayerColor, river_system: &Area<Water>) -> Self {
        let lakes = river_system.lake_count();
        let points = points::for_logboat(lakes);
        self.with_new_message(
            self.text_maker.player_scored_logboat(scorer, points, lakes),
            points,
            BTreeSet::from([scorer]),
            river_system.tile_ids(),
        )
    }

    pub fn with_scored_hunting_trap(
        &self,
        scorer: PlayerColor,
        adjacent_meadow: &Area<Meadow>,
        cancelled: &BTreeSet<Animal>,
    ) -> Self {
        self.with_scored_meadow_kind(MeadowScoring::HuntingTrap(scorer), adjacent_meadow, cancelled)
    }

    pub fn with_scored_meadow(&self, meadow: &Area<Meadow>, cancelled: &BTreeSet<Animal>) -> Self {
        self.with_scored_meadow_kind(MeadowScoring::Meadow, meadow, cancelled)
    }

    pub fn with_scored_pit_trap(
        &self,
        adjacent_meadow: &Area<Meadow>,
        cancelled: &BTreeSet<Animal>,
    ) -> Self {
        self.with_scored_meadow_kind(MeadowScoring::PitTrap, adjacent_meadow, cancelled)
    }

    pub fn with_scored_river_system(&self, river_system: &Area<Water>) -> Self {
        if !river_system.is_occupied() {
            return self.clone();
        }
        let fish = river_system.fish_count();
        let points = points::for_river_system(fish);
        if points == 0 {
            return self.clone();
        }
        let scorers = river_system.majority_occupants();
        self.with_new_message(
            self.text_maker
                .players_scored_river_system(&scorers, points, fish),
            points,
            scorers,
            river_system.tile_ids(),
        )
    }

    pub fn with_scored_raft(&self, river_system: &Area<Water>) -> Self {
        if !river_system.is_occupied() {
            return self.clone();
        }
        let lakes = river_system.lake_count();
        let points = points::for_raft(lakes);
        let scorers = river_system.majority_occupants();
        self.with_new_message(
            self.text_maker.players_scored_raft(&scorers, points, lakes),
            points,
            scorers,
            river_system.tile_ids(),
        )
    }

    pub fn with_winners(&self, winners: &BTreeSet<PlayerColor>, points: u32) -> Self {
        self.with_new_message(
            self.text_maker.players_won(winners, points),
            0,
            BTreeSet::new(),
            BTreeSet::new(),
        )
    }
}
