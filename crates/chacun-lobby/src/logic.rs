//! Text command handling across all lobbies and games

use crate::action::{GameActionData, PlayerContext, ServerAction};
use crate::game::OnGoingGame;
use crate::lobby::GameLobby;
use chacun_game::{TileCatalogue, MIN_PLAYER_COUNT};
use std::collections::HashMap;
use std::sync::Arc;

fn deny(action: ServerAction, reason: &str) -> GameActionData {
    GameActionData::reply(action, reason)
}

/// Every lobby and game of a server, keyed by game name
///
/// A name is either a lobby or a game, never both.
#[derive(Debug)]
pub struct GameLogic {
    catalogue: Arc<TileCatalogue>,
    lobbies: HashMap<String, GameLobby>,
    games: HashMap<String, OnGoingGame>,
}

impl GameLogic {
    pub fn new(catalogue: Arc<TileCatalogue>) -> Self {
        Self {
            catalogue,
            lobbies: HashMap::new(),
            games: HashMap::new(),
        }
    }

    pub fn lobby(&self, name: &str) -> Option<&GameLobby> {
        self.lobbies.get(name)
    }

    pub fn game(&self, name: &str) -> Option<&OnGoingGame> {
        self.games.get(name)
    }

    pub fn lobby_count(&self) -> usize {
        self.lobbies.len()
    }

    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    /// Parse a client message and apply it
    ///
    /// Returns `None` when nothing should be sent back: unknown actions,
    /// actions only the server sends, or leaving without being in a game.
    pub fn parse_and_apply(
        &mut self,
        message: &str,
        context: Option<&PlayerContext>,
    ) -> Option<GameActionData> {
        let (name, data) = match message.split_once('.') {
            Some((name, data)) => (name, Some(data)),
            None => (message, None),
        };
        let action: ServerAction = match name.parse() {
            Ok(action) => action,
            Err(err) => {
                tracing::debug!("ignoring message: {err}");
                return None;
            }
        };

        match action {
            ServerAction::GameJoin => Some(self.join(data, context)),
            ServerAction::GameAction => Some(self.act(data, context)),
            ServerAction::GameLeave => self.leave(context),
            ServerAction::GameMsg => Some(self.chat(data.unwrap_or_default(), context)),
            other => {
                tracing::debug!(action = %other, "ignoring server action sent by a client");
                None
            }
        }
    }

    fn join(&mut self, data: Option<&str>, context: Option<&PlayerContext>) -> GameActionData {
        let fields: Vec<&str> = data.map(|data| data.split(',').collect()).unwrap_or_default();
        let &[game_name, username] = fields.as_slice() else {
            return deny(ServerAction::GameJoinDeny, "INVALID_DATA");
        };
        if game_name.is_empty() || username.is_empty() {
            return deny(ServerAction::GameJoinDeny, "INVALID_DATA");
        }
        if context.is_some() {
            return deny(ServerAction::GameJoinDeny, "ALREADY_IN_GAME");
        }
        if let Some(lobby) = self.lobbies.get_mut(game_name) {
            return lobby.add_player(username);
        }
        if self.games.contains_key(game_name) {
            return deny(ServerAction::GameJoinDeny, "GAME_ALREADY_STARTED");
        }

        tracing::info!(game = game_name, host = username, "lobby created");
        self.lobbies
            .entry(game_name.to_string())
            .or_insert_with(|| GameLobby::new(game_name))
            .add_player(username)
    }

    fn act(&mut self, data: Option<&str>, context: Option<&PlayerContext>) -> GameActionData {
        let Some(context) = context else {
            return deny(ServerAction::GameActionDeny, "GAME_NOT_STARTED");
        };
        let Some(encoded) = data.filter(|data| !data.is_empty()) else {
            return deny(ServerAction::GameActionDeny, "INVALID_DATA");
        };
        let name = context.game_name.as_str();

        let can_start = self.lobbies.get(name).is_some_and(|lobby| {
            lobby.is_host(&context.username) && lobby.players().len() >= MIN_PLAYER_COUNT
        });
        if can_start {
            if let Some(lobby) = self.lobbies.remove(name) {
                match lobby.start_game(&self.catalogue) {
                    Ok(game) => {
                        self.games.insert(name.to_string(), game);
                    }
                    Err(err) => {
                        tracing::error!(game = name, "failed to start game: {err}");
                        self.lobbies.insert(name.to_string(), lobby);
                    }
                }
            }
        }

        let Some(game) = self.games.get_mut(name) else {
            return deny(ServerAction::GameActionDeny, "GAME_NOT_STARTED");
        };
        let response = game.apply_action(encoded, &context.username);
        if game.has_ended() {
            if let Some(game) = self.games.remove(name) {
                self.lobbies.insert(name.to_string(), game.into_lobby());
            }
        }
        response
    }

    fn leave(&mut self, context: Option<&PlayerContext>) -> Option<GameActionData> {
        let context = context?;
        let name = context.game_name.as_str();

        let mut lobby = match self.lobbies.remove(name) {
            Some(lobby) => lobby,
            None => {
                let game = self.games.remove(name)?;
                tracing::info!(game = name, username = %context.username, "game cancelled");
                game.into_lobby()
            }
        };
        let response = lobby.remove_player(&context.username);
        if lobby.is_empty() {
            tracing::info!(game = name, "lobby closed");
        } else {
            self.lobbies.insert(name.to_string(), lobby);
        }
        Some(response)
    }

    fn chat(&self, text: &str, context: Option<&PlayerContext>) -> GameActionData {
        match context {
            Some(context)
                if self.lobbies.contains_key(&context.game_name)
                    || self.games.contains_key(&context.game_name) =>
            {
                GameActionData::broadcast(
                    ServerAction::GameMsg,
                    format!("{}={text}", context.username),
                )
            }
            _ => deny(ServerAction::GameMsgDeny, "GAME_HAS_ENDED"),
        }
    }
}
