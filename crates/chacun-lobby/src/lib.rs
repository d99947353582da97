//! ChaCuN Lobby - Game rooms and the text protocol spoken by clients
//!
//! Clients send messages of the form `ACTION.data`:
//! - `GAMEJOIN.<game>,<username>` joins or creates a lobby
//! - `GAMEACTION.<code>` plays a Base32 action, starting the game if needed
//! - `GAMELEAVE` leaves the lobby, cancelling a running game
//! - `GAMEMSG.<text>` chats with the other players
//!
//! [`GameLogic`] applies them and tells the caller what to send back, to
//! whom, and how the sender's [`PlayerContext`] changes.
//!
//! ```no_run
//! use chacun_lobby::GameLogic;
//! use std::sync::Arc;
//!
//! let catalogue = Arc::new(chacun_game::TileCatalogue::builtin().unwrap());
//! let mut logic = GameLogic::new(catalogue);
//! let response = logic.parse_and_apply("GAMEJOIN.partie,alice", None);
//! ```

mod action;
mod error;
mod game;
mod lobby;
mod logic;

pub use action::{ContextChange, GameActionData, PlayerContext, ServerAction};
pub use error::{Error, Result};
pub use game::OnGoingGame;
pub use lobby::{GameLobby, MAX_PLAYERS};
pub use logic::GameLogic;
