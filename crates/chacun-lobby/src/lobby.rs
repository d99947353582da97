//! Players gathered under a game name, waiting for the game to start

use crate::action::{ContextChange, GameActionData, PlayerContext, ServerAction};
use crate::error::Result;
use crate::game::OnGoingGame;
use chacun_game::{PlayerColor, TileCatalogue};
use std::collections::BTreeMap;

/// Most players a game can hold, one per colour
pub const MAX_PLAYERS: usize = PlayerColor::ALL.len();

/// A game that has not started yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameLobby {
    name: String,
    players: Vec<String>,
}

impl GameLobby {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            players: Vec::with_capacity(MAX_PLAYERS),
        }
    }

    /// Lobby holding the given players, in join order
    pub fn with_players(name: impl Into<String>, players: Vec<String>) -> Self {
        Self {
            name: name.into(),
            players,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Usernames in join order
    pub fn players(&self) -> &[String] {
        &self.players
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Whether `username` is the player allowed to start the game
    pub fn is_host(&self, username: &str) -> bool {
        self.players.first().is_some_and(|host| host == username)
    }

    /// Add a player, accepting with the list of everyone in the lobby
    pub fn add_player(&mut self, username: &str) -> GameActionData {
        if self.players.iter().any(|player| player == username) {
            return GameActionData::reply(ServerAction::GameJoinDeny, "USERNAME_TAKEN");
        }
        if self.players.len() >= MAX_PLAYERS {
            return GameActionData::reply(ServerAction::GameJoinDeny, "GAME_FULL");
        }
        self.players.push(username.to_string());
        tracing::debug!(game = %self.name, username, "player joined lobby");
        GameActionData::broadcast(ServerAction::GameJoinAccept, self.players.join(","))
            .with_context(ContextChange::Attach(PlayerContext::new(&self.name, username)))
    }

    /// Remove a player, reporting who is left
    pub fn remove_player(&mut self, username: &str) -> GameActionData {
        self.players.retain(|player| player != username);
        tracing::debug!(game = %self.name, username, "player left lobby");
        let data = (!self.players.is_empty()).then(|| self.players.join(","));
        GameActionData {
            action: ServerAction::GameLeave,
            data,
            context: ContextChange::Detach,
            broadcast: true,
        }
    }

    /// Players keyed by colour, assigned in join order
    pub fn colors(&self) -> BTreeMap<PlayerColor, String> {
        PlayerColor::ALL
            .into_iter()
            .zip(self.players.iter().cloned())
            .collect()
    }

    /// Start a game with the current players
    pub fn start_game(&self, catalogue: &TileCatalogue) -> Result<OnGoingGame> {
        OnGoingGame::new(&self.name, self.colors(), catalogue)
    }
}
