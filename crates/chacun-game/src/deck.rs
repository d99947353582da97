//! Decks of tiles still to be drawn

use crate::error::{Error, Result};
use crate::tile::{Tile, TileKind};
use std::sync::Arc;

/// The three decks of a game, one per tile kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileDecks {
    start: Vec<Arc<Tile>>,
    normal: Vec<Arc<Tile>>,
    menhir: Vec<Arc<Tile>>,
}

impl TileDecks {
    pub fn new(start: Vec<Arc<Tile>>, normal: Vec<Arc<Tile>>, menhir: Vec<Arc<Tile>>) -> Self {
        Self {
            start,
            normal,
            menhir,
        }
    }

    /// Split tiles into decks by kind, keeping their relative order
    pub fn from_tiles(tiles: impl IntoIterator<Item = Arc<Tile>>) -> Self {
        let mut decks = Self::default();
        for tile in tiles {
            match tile.kind {
                TileKind::Start => decks.start.push(tile),
                TileKind::Normal => decks.normal.push(tile),
                TileKind::Menhir => decks.menhir.push(tile),
            }
        }
        decks
    }

    fn deck(&self, kind: TileKind) -> &[Arc<Tile>] {
        match kind {
            TileKind::Start => &self.start,
            TileKind::Normal => &self.normal,
            TileKind::Menhir => &self.menhir,
        }
    }

    pub fn deck_size(&self, kind: TileKind) -> usize {
        self.deck(kind).len()
    }

    pub fn top_tile(&self, kind: TileKind) -> Option<&Arc<Tile>> {
        self.deck(kind).first()
    }

    pub fn with_top_tile_drawn(&self, kind: TileKind) -> Result<Self> {
        let remaining = match self.deck(kind) {
            [] => return Err(Error::EmptyDeck(kind)),
            [_, rest @ ..] => rest.to_vec(),
        };
        let mut decks = self.clone();
        match kind {
            TileKind::Start => decks.start = remaining,
            TileKind::Normal => decks.normal = remaining,
            TileKind::Menhir => decks.menhir = remaining,
        }
        Ok(decks)
    }

    /// Draw tiles until the top one satisfies the predicate or the deck runs out
    pub fn with_top_tile_drawn_until(
        &self,
        kind: TileKind,
        predicate: impl Fn(&Arc<Tile>) -> bool,
    ) -> Self {
        let deck = self.deck(kind);
        let skip = deck
            .iter()
            .position(|tile| predicate(tile))
            .unwrap_or(deck.len());
        let remaining = deck[skip..].to_vec();
        let mut decks = self.clone();
        match kind {
            TileKind::Start => decks.start = remaining,
            TileKind::Normal => decks.normal = remaining,
            TileKind::Menhir => decks.menhir = remaining,
        }
        decks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{TileId, ZoneId};
    use crate::tile::TileSide;
    use crate::zone::{Forest, ForestKind};

    fn forest_tile(id: u32, kind: TileKind) -> Arc<Tile> {
        let side = TileSide::Forest(Forest {
            id: ZoneId(id * 10),
            kind: ForestKind::Plain,
        });
        Arc::new(Tile {
            id: TileId(id),
            kind,
            n: side.clone(),
            e: side.clone(),
            s: side.clone(),
            w: side,
        })
    }

    #[test]
    fn test_from_tiles_groups_by_kind() {
        let decks = TileDecks::from_tiles(vec![
            forest_tile(1, TileKind::Normal),
            forest_tile(56, TileKind::Start),
            forest_tile(2, TileKind::Normal),
            forest_tile(90, TileKind::Menhir),
        ]);
        assert_eq!(decks.deck_size(TileKind::Start), 1);
        assert_eq!(decks.deck_size(TileKind::Normal), 2);
        assert_eq!(decks.deck_size(TileKind::Menhir), 1);
        assert_eq!(decks.top_tile(TileKind::Normal).unwrap().id, TileId(1));
    }

    #[test]
    fn test_draw() {
        let decks = TileDecks::from_tiles(vec![forest_tile(1, TileKind::Normal)]);
        let drawn = decks.with_top_tile_drawn(TileKind::Normal).unwrap();
        assert_eq!(drawn.deck_size(TileKind::Normal), 0);
        assert!(drawn.top_tile(TileKind::Normal).is_none());
        assert!(drawn.with_top_tile_drawn(TileKind::Normal).is_err());
    }

    #[test]
    fn test_draw_until() {
        let decks = TileDecks::from_tiles((1..=5).map(|id| forest_tile(id, TileKind::Normal)));
        let drawn = decks.with_top_tile_drawn_until(TileKind::Normal, |tile| tile.id.0 >= 3);
        assert_eq!(drawn.top_tile(TileKind::Normal).unwrap().id, TileId(3));
        assert_eq!(drawn.deck_size(TileKind::Normal), 3);

        let exhausted = decks.with_top_tile_drawn_until(TileKind::Normal, |_| false);
        assert_eq!(exhausted.deck_size(TileKind::Normal), 0);
    }
}
