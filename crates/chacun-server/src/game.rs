//! ChaCuN games served over WebSocket

use crate::broadcaster::Broadcaster;
use crate::channel::{ChannelId, WebSocketChannel};
use crate::handler::WebSocketHandler;
use crate::watcher::TimeoutWatcher;
use chacun_game::TileCatalogue;
use chacun_lobby::{ContextChange, GameActionData, GameLogic, PlayerContext};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

/// Message applied for a player whose connection closes
const LEAVE: &str = "GAMELEAVE";

/// Routes client messages through the game logic and delivers responses
///
/// Responses are delivered while the logic is locked, so every player of
/// a game sees its events in the same order.
#[derive(Debug)]
pub struct GameServer {
    logic: Mutex<GameLogic>,
    broadcaster: Broadcaster,
    watcher: Arc<TimeoutWatcher>,
    contexts: RwLock<HashMap<ChannelId, PlayerContext>>,
}

impl GameServer {
    pub fn new(catalogue: Arc<TileCatalogue>, ping_interval: Duration) -> Self {
        Self {
            logic: Mutex::new(GameLogic::new(catalogue)),
            broadcaster: Broadcaster::new(),
            watcher: Arc::new(TimeoutWatcher::new(ping_interval)),
            contexts: RwLock::new(HashMap::new()),
        }
    }

    pub fn watcher(&self) -> &Arc<TimeoutWatcher> {
        &self.watcher
    }

    pub fn broadcaster(&self) -> &Broadcaster {
        &self.broadcaster
    }

    pub async fn context(&self, channel: &WebSocketChannel) -> Option<PlayerContext> {
        self.contexts.read().await.get(&channel.id()).cloned()
    }

    async fn apply(&self, channel: &WebSocketChannel, message: &str) {
        let mut logic = self.logic.lock().await;
        let context = self.context(channel).await;
        if let Some(response) = logic.parse_and_apply(message, context.as_ref()) {
            self.deliver(channel, context, response).await;
        }
    }

    async fn deliver(
        &self,
        channel: &WebSocketChannel,
        context: Option<PlayerContext>,
        response: GameActionData,
    ) {
        let text = response.to_string();
        let room = match &response.context {
            ContextChange::Attach(joined) => {
                self.broadcaster.subscribe(&joined.game_name, channel).await;
                self.contexts
                    .write()
                    .await
                    .insert(channel.id(), joined.clone());
                Some(joined.game_name.clone())
            }
            ContextChange::Keep | ContextChange::Detach => context.map(|context| context.game_name),
        };

        match (&room, response.broadcast) {
            (Some(room), true) => {
                let delivered = self.broadcaster.broadcast(room, &text).await;
                tracing::debug!(room, delivered, message = %text, "broadcast");
            }
            _ => {
                channel.send_text(text);
            }
        }

        if response.context == ContextChange::Detach {
            if let Some(room) = &room {
                self.broadcaster.unsubscribe(room, channel).await;
            }
            self.contexts.write().await.remove(&channel.id());
        }
    }
}

impl WebSocketHandler for GameServer {
    async fn on_open(&self, channel: &WebSocketChannel) {
        tracing::info!(channel = %channel.id(), peer = %channel.peer(), "player connected");
        self.watcher.watch(channel).await;
    }

    async fn on_message(&self, channel: &WebSocketChannel, message: String) {
        tracing::debug!(channel = %channel.id(), %message, "received");
        self.apply(channel, &message).await;
    }

    async fn on_pong(&self, channel: &WebSocketChannel, _payload: Vec<u8>) {
        self.watcher.register_pong(channel).await;
    }

    async fn on_close(&self, channel: &WebSocketChannel) {
        if self.context(channel).await.is_some() {
            self.apply(channel, LEAVE).await;
        }
        self.contexts.write().await.remove(&channel.id());
        self.watcher.unwatch(channel).await;
        tracing::info!(channel = %channel.id(), peer = %channel.peer(), "player disconnected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::tests::test_channel;
    use crate::channel::Outbound;
    use chacun_game::test_support::short_catalogue;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn server() -> GameServer {
        GameServer::new(Arc::new(short_catalogue()), Duration::from_secs(60))
    }

    fn texts(outbound: &mut UnboundedReceiver<Outbound>) -> Vec<String> {
        let mut texts = Vec::new();
        while let Ok(message) = outbound.try_recv() {
            if let Outbound::Text(text) = message {
                texts.push(text);
            }
        }
        texts
    }

    #[tokio::test]
    async fn test_join_and_chat() {
        let server = server();
        let (alice, mut alice_rx) = test_channel(1);
        let (bob, mut bob_rx) = test_channel(2);
        server.on_open(&alice).await;
        server.on_open(&bob).await;
        assert_eq!(server.watcher().len().await, 2);

        server.on_message(&alice, "GAMEJOIN.partie,alice".into()).await;
        server.on_message(&bob, "GAMEJOIN.partie,bob".into()).await;
        assert_eq!(texts(&mut alice_rx), ["GAMEJOIN_ACCEPT.alice", "GAMEJOIN_ACCEPT.alice,bob"]);
        assert_eq!(texts(&mut bob_rx), ["GAMEJOIN_ACCEPT.alice,bob"]);
        assert_eq!(server.context(&bob).await, Some(PlayerContext::new("partie", "bob")));

        server.on_message(&bob, "GAMEMSG.salut".into()).await;
        assert_eq!(texts(&mut alice_rx), ["GAMEMSG.bob=salut"]);
        assert_eq!(texts(&mut bob_rx), ["GAMEMSG.bob=salut"]);

        // Denials only reach the sender.
        server.on_message(&bob, "GAMEJOIN.autre,bob".into()).await;
        assert!(texts(&mut alice_rx).is_empty());
        assert_eq!(texts(&mut bob_rx), ["GAMEJOIN_DENY.ALREADY_IN_GAME"]);

        server.on_message(&bob, "BONJOUR".into()).await;
        assert!(texts(&mut bob_rx).is_empty());
    }

    #[tokio::test]
    async fn test_play_and_leave() {
        let server = server();
        let (alice, mut alice_rx) = test_channel(1);
        let (bob, mut bob_rx) = test_channel(2);
        server.on_message(&alice, "GAMEJOIN.partie,alice".into()).await;
        server.on_message(&bob, "GAMEJOIN.partie,bob".into()).await;
        texts(&mut alice_rx);
        texts(&mut bob_rx);

        server.on_message(&alice, "GAMEACTION.AM".into()).await;
        assert_eq!(texts(&mut bob_rx), ["GAMEACTION_ACCEPT.AM"]);
        server.on_message(&bob, "GAMEACTION.7".into()).await;
        assert_eq!(texts(&mut bob_rx), ["GAMEACTION_DENY.NOT_YOUR_TURN"]);
        assert_eq!(texts(&mut alice_rx), ["GAMEACTION_ACCEPT.AM"]);

        server.on_message(&bob, "GAMELEAVE".into()).await;
        assert_eq!(texts(&mut alice_rx), ["GAMELEAVE.alice"]);
        assert_eq!(texts(&mut bob_rx), ["GAMELEAVE.alice"]);
        assert_eq!(server.context(&bob).await, None);
        assert_eq!(server.broadcaster().room_size("partie").await, 1);

        server.on_message(&bob, "GAMEMSG.encore".into()).await;
        assert_eq!(texts(&mut bob_rx), ["GAMEMSG_DENY.GAME_HAS_ENDED"]);
        assert!(texts(&mut alice_rx).is_empty());
    }

    #[tokio::test]
    async fn test_close_leaves_game() {
        let server = server();
        let (alice, mut alice_rx) = test_channel(1);
        let (bob, _bob_rx) = test_channel(2);
        server.on_open(&alice).await;
        server.on_open(&bob).await;
        server.on_message(&alice, "GAMEJOIN.partie,alice".into()).await;
        server.on_message(&bob, "GAMEJOIN.partie,bob".into()).await;
        texts(&mut alice_rx);

        server.on_close(&bob).await;
        assert_eq!(texts(&mut alice_rx), ["GAMELEAVE.alice"]);
        assert_eq!(server.watcher().len().await, 1);

        server.on_close(&alice).await;
        assert!(server.watcher().is_empty().await);
        assert_eq!(server.broadcaster().room_count().await, 0);
    }

    #[tokio::test]
    async fn test_ping_is_answered() {
        let server = server();
        let (alice, mut alice_rx) = test_channel(1);
        server.on_ping(&alice, b"abc".to_vec()).await;
        assert_eq!(alice_rx.try_recv().unwrap(), Outbound::Pong(b"abc".to_vec()));
    }
}
