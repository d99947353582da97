//! A game being played

use crate::action::{GameActionData, ServerAction};
use crate::error::Result;
use crate::lobby::GameLobby;
use chacun_game::{action, GameState, NextAction, PlayerColor, TextMakerFr, TileCatalogue};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A started game and the usernames behind each colour
#[derive(Debug, Clone)]
pub struct OnGoingGame {
    name: String,
    players: BTreeMap<PlayerColor, String>,
    state: GameState,
}

impl OnGoingGame {
    /// Start a game, shuffling the decks from the game name
    pub fn new(
        name: &str,
        players: BTreeMap<PlayerColor, String>,
        catalogue: &TileCatalogue,
    ) -> Result<Self> {
        let decks = catalogue.shuffled_decks(name);
        let colors = players.keys().copied().collect();
        let text_maker = Arc::new(TextMakerFr::new(players.clone()));
        let state = GameState::initial(colors, decks, text_maker)?.with_starting_tile_placed()?;
        tracing::info!(game = name, players = players.len(), "game started");
        Ok(Self {
            name: name.to_string(),
            players,
            state,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn players(&self) -> &BTreeMap<PlayerColor, String> {
        &self.players
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn has_ended(&self) -> bool {
        self.state.next_action() == NextAction::EndGame
    }

    /// Username of the player expected to act
    pub fn current_username(&self) -> Option<&str> {
        let color = self.state.current_player()?;
        self.players.get(&color).map(String::as_str)
    }

    /// Apply an encoded action sent by `username`
    pub fn apply_action(&mut self, encoded: &str, username: &str) -> GameActionData {
        if self.current_username() != Some(username) {
            return GameActionData::reply(ServerAction::GameActionDeny, "NOT_YOUR_TURN");
        }
        match action::decode_and_apply(&self.state, encoded) {
            Ok(applied) => {
                self.state = applied.state;
                if self.has_ended() {
                    tracing::info!(game = %self.name, "game ended");
                    GameActionData::broadcast(ServerAction::GameEnd, "PLAYER_HAS_WON")
                } else {
                    GameActionData::broadcast(ServerAction::GameActionAccept, applied.action)
                }
            }
            Err(err) => {
                tracing::debug!(game = %self.name, username, action = encoded, "rejected action: {err}");
                GameActionData::reply(ServerAction::GameActionDeny, "INVALID_ACTION")
            }
        }
    }

    /// Back to a lobby holding the same players, in colour order
    pub fn into_lobby(self) -> GameLobby {
        GameLobby::with_players(self.name, self.players.into_values().collect())
    }
}
