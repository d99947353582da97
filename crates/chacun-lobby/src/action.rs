//! Protocol actions and the responses sent back to players
//!
//! Messages are plain text of the form `ACTION` or `ACTION.data`, where
//! `data` holds comma-separated fields.

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// Actions exchanged between clients and the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerAction {
    GameJoin,
    GameJoinAccept,
    GameJoinDeny,
    GameLeave,
    GameAction,
    GameActionAccept,
    GameActionDeny,
    GameEnd,
    GameMsg,
    GameMsgDeny,
}

impl ServerAction {
    pub const ALL: [ServerAction; 10] = [
        ServerAction::GameJoin,
        ServerAction::GameJoinAccept,
        ServerAction::GameJoinDeny,
        ServerAction::GameLeave,
        ServerAction::GameAction,
        ServerAction::GameActionAccept,
        ServerAction::GameActionDeny,
        ServerAction::GameEnd,
        ServerAction::GameMsg,
        ServerAction::GameMsgDeny,
    ];

    /// Name on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            ServerAction::GameJoin => "GAMEJOIN",
            ServerAction::GameJoinAccept => "GAMEJOIN_ACCEPT",
            ServerAction::GameJoinDeny => "GAMEJOIN_DENY",
            ServerAction::GameLeave => "GAMELEAVE",
            ServerAction::GameAction => "GAMEACTION",
            ServerAction::GameActionAccept => "GAMEACTION_ACCEPT",
            ServerAction::GameActionDeny => "GAMEACTION_DENY",
            ServerAction::GameEnd => "GAMEEND",
            ServerAction::GameMsg => "GAMEMSG",
            ServerAction::GameMsgDeny => "GAMEMSG_DENY",
        }
    }
}

impl fmt::Display for ServerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServerAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| Error::UnknownAction(s.to_string()))
    }
}

/// Identity a connection acquires by joining a game
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerContext {
    pub game_name: String,
    pub username: String,
}

impl PlayerContext {
    pub fn new(game_name: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            game_name: game_name.into(),
            username: username.into(),
        }
    }
}

/// What happens to the sender's context after a response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ContextChange {
    #[default]
    Keep,
    Attach(PlayerContext),
    Detach,
}

/// Response to a client message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameActionData {
    pub action: ServerAction,
    pub data: Option<String>,
    pub context: ContextChange,
    /// Send to every connection of the game instead of the sender only
    pub broadcast: bool,
}

impl GameActionData {
    /// Reply to the sender only
    pub fn reply(action: ServerAction, data: impl Into<String>) -> Self {
        Self {
            action,
            data: Some(data.into()),
            context: ContextChange::Keep,
            broadcast: false,
        }
    }

    /// Send to the whole game
    pub fn broadcast(action: ServerAction, data: impl Into<String>) -> Self {
        Self {
            broadcast: true,
            ..Self::reply(action, data)
        }
    }

    pub fn with_context(mut self, context: ContextChange) -> Self {
        self.context = context;
        self
    }
}

impl fmt::Display for GameActionData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            Some(data) => write!(f, "{}.{data}", self.action),
            None => write!(f, "{}", self.action),
        }
    }
}
