//! Rooms of connections receiving the same messages

use crate::channel::{ChannelId, WebSocketChannel};
use indexmap::IndexMap;
use tokio::sync::RwLock;

/// Subscriptions keyed by room, in subscription order
///
/// A room exists only while it has subscribers.
#[derive(Debug, Default)]
pub struct Broadcaster {
    rooms: RwLock<IndexMap<String, IndexMap<ChannelId, WebSocketChannel>>>,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn subscribe(&self, room: &str, channel: &WebSocketChannel) {
        let mut rooms = self.rooms.write().await;
        rooms
            .entry(room.to_string())
            .or_default()
            .insert(channel.id(), channel.clone());
        tracing::debug!(room, channel = %channel.id(), "subscribed");
    }

    pub async fn unsubscribe(&self, room: &str, channel: &WebSocketChannel) {
        let mut rooms = self.rooms.write().await;
        let Some(subscribers) = rooms.get_mut(room) else {
            return;
        };
        subscribers.shift_remove(&channel.id());
        if subscribers.is_empty() {
            rooms.shift_remove(room);
        }
        tracing::debug!(room, channel = %channel.id(), "unsubscribed");
    }

    /// Send a text message to every subscriber, returning how many got it
    pub async fn broadcast(&self, room: &str, text: &str) -> usize {
        let rooms = self.rooms.read().await;
        let Some(subscribers) = rooms.get(room) else {
            return 0;
        };
        subscribers
            .values()
            .filter(|channel| channel.send_text(text))
            .count()
    }

    pub async fn room_size(&self, room: &str) -> usize {
        self.rooms.read().await.get(room).map_or(0, IndexMap::len)
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }
}
