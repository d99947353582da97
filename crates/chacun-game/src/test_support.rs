//! Tile fixtures shared by the tests of this crate and its dependents
//!
//! Enabled for unit tests, and for other crates through the `test-support`
//! feature.

use crate::catalogue::TileCatalogue;
use crate::deck::TileDecks;
use crate::identity::TileId;
use crate::player::PlayerColor;
use crate::state::GameState;
use crate::text::TextMakerFr;
use crate::tile::Tile;
use std::sync::Arc;

/// Start tile and a single normal tile: one placement and one occupation end the game
pub const SHORT_GAME: &str = r#"TileCatalogue(tiles: [
    TileDef(id: 56, kind: Start,
        zones: [
            Meadow(local: 0, animals: [Aurochs]),
            Forest(local: 1, kind: WithMenhir),
            Meadow(local: 2),
            River(local: 3, lake: Some(8)),
            Lake(local: 8, fish: 1),
        ],
        n: Meadow(0), e: Forest(1), s: Forest(1), w: River(2, 3, 0)),
    TileDef(id: 1, kind: Normal,
        zones: [Forest(local: 0), Meadow(local: 1, animals: [Deer, Tiger])],
        n: Meadow(1), e: Meadow(1), s: Meadow(1), w: Forest(0)),
])"#;

const TEST_TILES: &str = r#"TileCatalogue(tiles: [
    TileDef(id: 56, kind: Start,
        zones: [
            Meadow(local: 0, animals: [Aurochs]),
            Forest(local: 1, kind: WithMenhir),
            Meadow(local: 2),
            River(local: 3, lake: Some(8)),
            Lake(local: 8, fish: 1),
        ],
        n: Meadow(0), e: Forest(1), s: Forest(1), w: River(2, 3, 0)),
    TileDef(id: 1, kind: Normal,
        zones: [Forest(local: 0), Meadow(local: 1, animals: [Deer, Tiger])],
        n: Meadow(1), e: Meadow(1), s: Meadow(1), w: Forest(0)),
    TileDef(id: 2, kind: Normal,
        zones: [Forest(local: 0, kind: WithMushrooms)],
        n: Forest(0), e: Forest(0), s: Forest(0), w: Forest(0)),
    TileDef(id: 3, kind: Normal,
        zones: [Forest(local: 0), Meadow(local: 1)],
        n: Meadow(1), e: Meadow(1), s: Meadow(1), w: Forest(0)),
    TileDef(id: 4, kind: Normal,
        zones: [Forest(local: 0), Meadow(local: 1)],
        n: Forest(0), e: Meadow(1), s: Meadow(1), w: Meadow(1)),
    TileDef(id: 5, kind: Normal,
        zones: [Meadow(local: 0, power: Some(PitTrap))],
        n: Meadow(0), e: Meadow(0), s: Meadow(0), w: Meadow(0)),
    TileDef(id: 6, kind: Normal,
        zones: [Meadow(local: 0, animals: [Deer, Deer, Tiger], power: Some(HuntingTrap))],
        n: Meadow(0), e: Meadow(0), s: Meadow(0), w: Meadow(0)),
    TileDef(id: 7, kind: Normal,
        zones: [Meadow(local: 0, power: Some(Shaman))],
        n: Meadow(0), e: Meadow(0), s: Meadow(0), w: Meadow(0)),
    TileDef(id: 8, kind: Normal,
        zones: [Meadow(local: 0, animals: [Deer])],
        n: Meadow(0), e: Meadow(0), s: Meadow(0), w: Meadow(0)),
    TileDef(id: 21, kind: Normal,
        zones: [
            Meadow(local: 0),
            Meadow(local: 1),
            River(local: 2, fish: 2, lake: Some(8)),
            Lake(local: 8, fish: 1, power: Some(Logboat)),
        ],
        n: Meadow(0), e: River(0, 2, 1), s: Meadow(1), w: Meadow(1)),
    TileDef(id: 22, kind: Normal,
        zones: [
            Meadow(local: 0),
            Meadow(local: 1),
            River(local: 2, fish: 2, lake: Some(8)),
            Lake(local: 8, fish: 1, power: Some(Raft)),
        ],
        n: Meadow(0), e: River(0, 2, 1), s: Meadow(1), w: Meadow(1)),
    TileDef(id: 90, kind: Menhir,
        zones: [Meadow(local: 0, power: Some(WildFire))],
        n: Meadow(0), e: Meadow(0), s: Meadow(0), w: Meadow(0)),
])"#;

/// Catalogue of [`SHORT_GAME`]
pub fn short_catalogue() -> TileCatalogue {
    TileCatalogue::from_ron_str(SHORT_GAME).unwrap()
}

/// Catalogue with one tile per special power, plus plain forests and meadows
pub fn catalogue() -> TileCatalogue {
    TileCatalogue::from_ron_str(TEST_TILES).unwrap()
}

pub fn tile(id: u32) -> Arc<Tile> {
    catalogue().tile(TileId(id)).unwrap().clone()
}

/// Red and Blue game with the start tile placed and the given decks, in order
pub fn game(normal: &[u32], menhir: &[u32]) -> GameState {
    let decks = TileDecks::new(
        vec![tile(56)],
        normal.iter().map(|id| tile(*id)).collect(),
        menhir.iter().map(|id| tile(*id)).collect(),
    );
    GameState::initial(
        vec![PlayerColor::Red, PlayerColor::Blue],
        decks,
        Arc::new(TextMakerFr::default()),
    )
    .unwrap()
    .with_starting_tile_placed()
    .unwrap()
}
