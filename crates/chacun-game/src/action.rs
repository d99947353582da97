//! Compact encoding of player actions
//!
//! Actions travel between players as one or two Base32 characters:
//!
//! - placing a tile: index of the position among the insertion positions
//!   (sorted by x then y), shifted left by two and or-ed with the rotation;
//! - placing an occupant: `kind << 4 | local zone id`;
//! - taking back an occupant: index among the board's occupants sorted by
//!   zone id.
//!
//! `11111` stands for "no occupant" in both occupant actions.

use crate::base32;
use crate::error::{Error, Result};
use crate::geometry::{Pos, Rotation};
use crate::identity::ZoneId;
use crate::player::{Occupant, OccupantKind};
use crate::state::{GameState, NextAction};
use crate::tile::PlacedTile;

const NO_OCCUPANT: u32 = 0b1_1111;

/// A state paired with the encoded action that produced it
#[derive(Debug, Clone)]
pub struct StateAction {
    pub state: GameState,
    pub action: String,
}

fn sorted_insertion_positions(state: &GameState) -> Vec<Pos> {
    // BTreeSet<Pos> is already ordered by x then y
    state.board().insertion_positions().into_iter().collect()
}

fn occupants_by_zone(state: &GameState) -> Vec<Occupant> {
    let mut occupants: Vec<Occupant> = state.board().occupants().into_iter().collect();
    occupants.sort_by_key(|occupant| occupant.zone_id);
    occupants
}

fn invalid(reason: impl Into<String>) -> Error {
    Error::IllegalAction(reason.into())
}

/// Place a tile and encode the action
pub fn with_placed_tile(state: &GameState, tile: PlacedTile) -> Result<StateAction> {
    let index = sorted_insertion_positions(state)
        .iter()
        .position(|pos| *pos == tile.pos)
        .ok_or(Error::IllegalPlacement(tile.pos))?;
    let code = (index as u32) << 2 | tile.rotation.quarter_turns_cw() as u32;
    Ok(StateAction {
        state: state.with_placed_tile(tile)?,
        action: base32::encode_bits10(code),
    })
}

/// Occupy the last placed tile, or not, and encode the action
pub fn with_new_occupant(state: &GameState, occupant: Option<Occupant>) -> Result<StateAction> {
    let code = match occupant {
        Some(occupant) => {
            (occupant.kind.index() as u32) << 4 | u32::from(occupant.zone_id.local_id())
        }
        None => NO_OCCUPANT,
    };
    Ok(StateAction {
        state: state.with_new_occupant(occupant)?,
        action: base32::encode_bits5(code),
    })
}

/// Take back an occupant, or none, and encode the action
pub fn with_occupant_removed(state: &GameState, occupant: Option<Occupant>) -> Result<StateAction> {
    let code = match occupant {
        Some(occupant) => occupants_by_zone(state)
            .iter()
            .position(|o| *o == occupant)
            .ok_or_else(|| invalid("occupant is not on the board"))? as u32,
        None => NO_OCCUPANT,
    };
    Ok(StateAction {
        state: state.with_occupant_removed(occupant)?,
        action: base32::encode_bits5(code),
    })
}

/// Decode an action and apply it to the state
///
/// Fails when the string is malformed, an index is out of range or the
/// action is not legal in the current state.
pub fn decode_and_apply(state: &GameState, action: &str) -> Result<StateAction> {
    if !base32::is_valid(action) {
        return Err(invalid(format!("{action:?} is not base32")));
    }
    let code = base32::decode(action).ok_or_else(|| invalid(format!("{action:?} cannot be decoded")))?;
    let length = action.len();

    let state = match (state.next_action(), length) {
        (NextAction::PlaceTile, 2) => {
            let positions = sorted_insertion_positions(state);
            let pos = *positions
                .get((code >> 2) as usize)
                .ok_or_else(|| invalid("insertion position out of range"))?;
            let tile = state
                .tile_to_place()
                .cloned()
                .ok_or_else(|| invalid("no tile to place"))?;
            let placed = PlacedTile::new(
                tile,
                state.current_player(),
                Rotation::from_index((code & 0b11) as usize),
                pos,
            );
            if !state.board().can_add_tile(&placed) {
                return Err(Error::IllegalPlacement(pos));
            }
            state.with_placed_tile(placed)?
        }
        (NextAction::OccupyTile, 1) => {
            let occupant = if code == NO_OCCUPANT {
                None
            } else {
                let kind = OccupantKind::ALL
                    .get((code >> 4) as usize)
                    .copied()
                    .ok_or_else(|| invalid("unknown occupant kind"))?;
                let tile = state
                    .board()
                    .last_placed_tile()
                    .ok_or_else(|| invalid("no tile has been placed"))?;
                let local = (code & 0b1111) as u8;
                if local > ZoneId::MAX_LOCAL_ID {
                    return Err(invalid("local zone id out of range"));
                }
                let occupant = Occupant::new(kind, ZoneId::new(tile.id(), local));
                if !state.last_tile_potential_occupants()?.contains(&occupant) {
                    return Err(Error::InvalidOccupation {
                        kind,
                        zone: occupant.zone_id,
                    });
                }
                Some(occupant)
            };
            state.with_new_occupant(occupant)?
        }
        (NextAction::RetakePawn, 1) => {
            let occupant = if code == NO_OCCUPANT {
                None
            } else {
                let occupant = *occupants_by_zone(state)
                    .get(code as usize)
                    .ok_or_else(|| invalid("occupant index out of range"))?;
                let placer = state
                    .board()
                    .tile_with_id(occupant.zone_id.tile_id())?
                    .placer;
                if occupant.kind != OccupantKind::Pawn || placer != state.current_player() {
                    return Err(Error::InvalidOccupation {
                        kind: occupant.kind,
                        zone: occupant.zone_id,
                    });
                }
                Some(occupant)
            };
            state.with_occupant_removed(occupant)?
        }
        (next, length) => {
            return Err(invalid(format!(
                "action of length {length} is not expected at {next:?}"
            )))
        }
    };

    Ok(StateAction {
        state,
        action: action.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerColor;
    use crate::test_support::game;

    #[test]
    fn test_encode_placed_tile() {
        let state = game(&[1, 2], &[]);
        let tile = state.tile_to_place().unwrap().clone();
        let placed = PlacedTile::new(tile, Some(PlayerColor::Red), Rotation::None, Pos::new(1, 0));
        let result = with_placed_tile(&state, placed).unwrap();
        assert_eq!(result.action, "AM");
        assert_eq!(result.state.next_action(), NextAction::OccupyTile);

        let occupied = with_new_occupant(&result.state, Some(Occupant::pawn(ZoneId(11)))).unwrap();
        assert_eq!(occupied.action, "B");
    }

    #[test]
    fn test_decode_whole_game() {
        let state = game(&[1, 2, 7], &[]);
        let state = decode_and_apply(&state, "AM").unwrap().state;
        let state = decode_and_apply(&state, "A").unwrap().state;
        assert_eq!(
            state.board().occupants().into_iter().collect::<Vec<_>>(),
            vec![Occupant::pawn(ZoneId(10))]
        );
        assert_eq!(state.current_player(), Some(PlayerColor::Blue));

        // Blue has nowhere to put a pawn, the turn ends right away.
        let state = decode_and_apply(&state, "AI").unwrap().state;
        assert_eq!(state.current_player(), Some(PlayerColor::Red));

        // Shaman: Red takes the pawn back, then places nothing.
        let state = decode_and_apply(&state, "AI").unwrap().state;
        assert_eq!(state.next_action(), NextAction::RetakePawn);
        let state = decode_and_apply(&state, "A").unwrap().state;
        assert!(state.board().occupants().is_empty());
        let state = decode_and_apply(&state, "7").unwrap().state;
        assert_eq!(state.next_action(), NextAction::EndGame);
    }

    #[test]
    fn test_decode_rejects_malformed_actions() {
        let state = game(&[1, 2], &[]);
        assert!(decode_and_apply(&state, "").is_err());
        assert!(decode_and_apply(&state, "am").is_err());
        assert!(decode_and_apply(&state, "A").is_err());
        assert!(decode_and_apply(&state, "AAA").is_err());
        // Index 255 is far past the four insertion positions.
        assert!(decode_and_apply(&state, "77").is_err());
        // West of the start tile with no rotation: meadow against river.
        assert!(decode_and_apply(&state, "AA").is_err());
    }

    #[test]
    fn test_decode_rejects_unavailable_occupant() {
        let state = game(&[1, 2], &[]);
        let state = decode_and_apply(&state, "AM").unwrap().state;
        // Local zone 5 does not exist on the tile.
        assert!(decode_and_apply(&state, "F").is_err());
        // Huts can't go in a forest.
        assert!(decode_and_apply(&state, "Q").is_err());
        // Local ids 10 to 15 fit in four bits but name no zone; 11 must not
        // alias the meadow at local 1.
        assert!(decode_and_apply(&state, "L").is_err());
        assert!(decode_and_apply(&state, "P").is_err());
        assert!(decode_and_apply(&state, "B").is_ok());
    }

    #[test]
    fn test_retake_requires_own_pawn() {
        let state = game(&[1, 3, 7], &[]);
        // Red: pawn in the meadow east of the start tile.
        let state = decode_and_apply(&state, "AM").unwrap().state;
        let state = decode_and_apply(&state, "B").unwrap().state;
        // Blue: forest turned north, south of the start tile, pawn in its meadow.
        let state = decode_and_apply(&state, "AJ").unwrap().state;
        let state = decode_and_apply(&state, "B").unwrap().state;
        assert_eq!(state.board().occupants().len(), 2);

        // Red places the shaman north of the start tile.
        let state = decode_and_apply(&state, "AI").unwrap().state;
        assert_eq!(state.next_action(), NextAction::RetakePawn);
        assert!(decode_and_apply(&state, "B").is_err());
        assert!(decode_and_apply(&state, "C").is_err());
        let state = decode_and_apply(&state, "A").unwrap().state;
        assert_eq!(
            state.board().occupants().into_iter().collect::<Vec<_>>(),
            vec![Occupant::pawn(ZoneId(31))]
        );
    }
}
