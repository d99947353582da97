//! Player-facing texts describing scoring events

use crate::player::PlayerColor;
use crate::zone::AnimalKind;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Generates the messages shown to players
pub trait TextMaker: fmt::Debug + Send + Sync {
    fn player_name(&self, player: PlayerColor) -> String;

    fn points(&self, points: u32) -> String;

    fn player_closed_forest_with_menhir(&self, player: PlayerColor) -> String;

    fn players_scored_forest(
        &self,
        scorers: &BTreeSet<PlayerColor>,
        points: u32,
        mushroom_group_count: u32,
        tile_count: u32,
    ) -> String;

    fn players_scored_river(
        &self,
        scorers: &BTreeSet<PlayerColor>,
        points: u32,
        fish_count: u32,
        tile_count: u32,
    ) -> String;

    fn player_scored_hunting_trap(
        &self,
        scorer: PlayerColor,
        points: u32,
        animals: &BTreeMap<AnimalKind, u32>,
    ) -> String;

    fn player_scored_logboat(&self, scorer: PlayerColor, points: u32, lake_count: u32) -> String;

    fn players_scored_meadow(
        &self,
        scorers: &BTreeSet<PlayerColor>,
        points: u32,
        animals: &BTreeMap<AnimalKind, u32>,
    ) -> String;

    fn players_scored_river_system(
        &self,
        scorers: &BTreeSet<PlayerColor>,
        points: u32,
        fish_count: u32,
    ) -> String;

    fn players_scored_pit_trap(
        &self,
        scorers: &BTreeSet<PlayerColor>,
        points: u32,
        animals: &BTreeMap<AnimalKind, u32>,
    ) -> String;

    fn players_scored_raft(
        &self,
        scorers: &BTreeSet<PlayerColor>,
        points: u32,
        lake_count: u32,
    ) -> String;

    fn players_won(&self, winners: &BTreeSet<PlayerColor>, points: u32) -> String;

    fn click_to_occupy(&self) -> String;

    fn click_to_unoccupy(&self) -> String;
}

/// French texts
#[derive(Debug, Clone, Default)]
pub struct TextMakerFr {
    names: BTreeMap<PlayerColor, String>,
}

fn pluralize(word: &str, count: u32) -> String {
    if count > 1 {
        format!("{word}s")
    } else {
        word.to_string()
    }
}

fn counted(word: &str, count: u32) -> String {
    format!("{count} {}", pluralize(word, count))
}

/// Join items as "a, b et c"
fn items_to_string(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [single] => single.clone(),
        [init @ .., last] => format!("{} et {last}", init.join(", ")),
    }
}

fn animal_name(kind: AnimalKind) -> &'static str {
    match kind {
        AnimalKind::Mammoth => "mammouth",
        AnimalKind::Aurochs => "auroch",
        AnimalKind::Deer => "cerf",
        AnimalKind::Tiger => "tigre",
    }
}

impl TextMakerFr {
    pub fn new(names: BTreeMap<PlayerColor, String>) -> Self {
        Self { names }
    }

    fn earn(&self, scorers: &BTreeSet<PlayerColor>) -> String {
        let names: Vec<String> = scorers.iter().map(|p| self.player_name(*p)).collect();
        let verb = if scorers.len() == 1 { "a" } else { "ont" };
        format!("{} {verb} remporté", items_to_string(&names))
    }

    fn earn_points(&self, scorers: &BTreeSet<PlayerColor>, points: u32) -> String {
        format!("{} {}", self.earn(scorers), self.points(points))
    }

    fn earn_as_majority(&self, scorers: &BTreeSet<PlayerColor>, points: u32) -> String {
        let count = scorers.len() as u32;
        let suffix = if count > 1 { "·s" } else { "" };
        format!(
            "{} en tant qu'occupant·e{suffix} {}",
            self.earn_points(scorers, points),
            pluralize("majoritaire", count)
        )
    }

    fn animals_to_string(animals: &BTreeMap<AnimalKind, u32>) -> String {
        let items: Vec<String> = animals
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(kind, count)| counted(animal_name(*kind), *count))
            .collect();
        items_to_string(&items)
    }
}

impl TextMaker for TextMakerFr {
    fn player_name(&self, player: PlayerColor) -> String {
        self.names
            .get(&player)
            .cloned()
            .unwrap_or_else(|| player.to_string())
    }

    fn points(&self, points: u32) -> String {
        counted("point", points)
    }

    fn player_closed_forest_with_menhir(&self, player: PlayerColor) -> String {
        format!(
            "{} a fermé une forêt contenant un menhir et peut donc placer une tuile menhir.",
            self.player_name(player)
        )
    }

    fn players_scored_forest(
        &self,
        scorers: &BTreeSet<PlayerColor>,
        points: u32,
        mushroom_group_count: u32,
        tile_count: u32,
    ) -> String {
        let mushrooms = if mushroom_group_count > 0 {
            format!(
                " et de {} de champignons.",
                counted("groupe", mushroom_group_count)
            )
        } else {
            ".".to_string()
        };
        format!(
            "{} d'une forêt composée de {}{mushrooms}",
            self.earn_as_majority(scorers, points),
            counted("tuile", tile_count)
        )
    }

    fn players_scored_river(
        &self,
        scorers: &BTreeSet<PlayerColor>,
        points: u32,
        fish_count: u32,
        tile_count: u32,
    ) -> String {
        let fish = if fish_count > 0 {
            format!(" et contenant {}.", counted("poisson", fish_count))
        } else {
            ".".to_string()
        };
        format!(
            "{} d'une rivière composée de {}{fish}",
            self.earn_as_majority(scorers, points),
            counted("tuile", tile_count)
        )
    }

    fn player_scored_hunting_trap(
        &self,
        scorer: PlayerColor,
        points: u32,
        animals: &BTreeMap<AnimalKind, u32>,
    ) -> String {
        format!(
            "{} en plaçant la fosse à pieux dans un pré dans lequel elle est entourée de {}.",
            self.earn_points(&BTreeSet::from([scorer]), points),
            Self::animals_to_string(animals)
        )
    }

    fn player_scored_logboat(&self, scorer: PlayerColor, points: u32, lake_count: u32) -> String {
        format!(
            "{} en plaçant la pirogue dans un réseau hydrographique contenant {}.",
            self.earn_points(&BTreeSet::from([scorer]), points),
            counted("lac", lake_count)
        )
    }

    fn players_scored_meadow(
        &self,
        scorers: &BTreeSet<PlayerColor>,
        points: u32,
        animals: &BTreeMap<AnimalKind, u32>,
    ) -> String {
        format!(
            "{} d'un pré contenant {}.",
            self.earn_as_majority(scorers, points),
            Self::animals_to_string(animals)
        )
    }

    fn players_scored_river_system(
        &self,
        scorers: &BTreeSet<PlayerColor>,
        points: u32,
        fish_count: u32,
    ) -> String {
        format!(
            "{} d'un réseau hydrographique contenant {}.",
            self.earn_as_majority(scorers, points),
            counted("poisson", fish_count)
        )
    }

    fn players_scored_pit_trap(
        &self,
        scorers: &BTreeSet<PlayerColor>,
        points: u32,
        animals: &BTreeMap<AnimalKind, u32>,
    ) -> String {
        format!(
            "{} d'un pré contenant la grande fosse à pieux entourée de {}.",
            self.earn_as_majority(scorers, points),
            Self::animals_to_string(animals)
        )
    }

    fn players_scored_raft(
        &self,
        scorers: &BTreeSet<PlayerColor>,
        points: u32,
        lake_count: u32,
    ) -> String {
        format!(
            "{} d'un réseau hydrographique contenant le radeau et {}.",
            self.earn_as_majority(scorers, points),
            counted("lac", lake_count)
        )
    }

    fn players_won(&self, winners: &BTreeSet<PlayerColor>, points: u32) -> String {
        format!("{} la partie avec {} !", self.earn(winners), self.points(points))
    }

    fn click_to_occupy(&self) -> String {
        "Cliquez sur le pion ou la hutte que vous désirez placer, ou ici pour ne pas en placer."
            .to_string()
    }

    fn click_to_unoccupy(&self) -> String {
        "Cliquez sur le pion que vous désirez reprendre, ou ici pour ne pas en reprendre."
            .to_string()
    }
}
