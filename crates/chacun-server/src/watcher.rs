//! Liveness checks based on pings and pongs
//!
//! Every interval, each watched connection is pinged. A connection whose
//! last pong is too old is closed with `PLAYER_TIMEOUT`, and dropped
//! outright if it stays silent after that.

use crate::channel::{ChannelId, WebSocketChannel};
use chacun_wire::CloseStatusCode;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Close reason sent to silent players
pub const PLAYER_TIMEOUT: &str = "PLAYER_TIMEOUT";

/// What a tick did to a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Ping,
    Close,
    Terminate,
}

/// Verdict for a connection silent for `elapsed` since its last pong
pub fn verdict(elapsed: Duration, interval: Duration) -> Verdict {
    let silence = elapsed.saturating_sub(interval);
    if silence > interval * 2 {
        Verdict::Terminate
    } else if silence > interval {
        Verdict::Close
    } else {
        Verdict::Ping
    }
}

#[derive(Debug)]
struct Watched {
    channel: WebSocketChannel,
    last_pong: Instant,
}

/// Tracks the last pong of every open connection
#[derive(Debug)]
pub struct TimeoutWatcher {
    interval: Duration,
    watched: Mutex<HashMap<ChannelId, Watched>>,
}

impl TimeoutWatcher {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            watched: Mutex::new(HashMap::new()),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start watching a connection, as if it had just answered
    pub async fn watch(&self, channel: &WebSocketChannel) {
        let watched = Watched {
            channel: channel.clone(),
            last_pong: Instant::now(),
        };
        self.watched.lock().await.insert(channel.id(), watched);
    }

    pub async fn unwatch(&self, channel: &WebSocketChannel) {
        self.watched.lock().await.remove(&channel.id());
    }

    pub async fn register_pong(&self, channel: &WebSocketChannel) {
        if let Some(watched) = self.watched.lock().await.get_mut(&channel.id()) {
            watched.last_pong = Instant::now();
        }
    }

    pub async fn len(&self) -> usize {
        self.watched.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Ping, close or drop every watched connection
    pub async fn tick(&self) {
        let now = Instant::now();
        let watched = self.watched.lock().await;
        for watched in watched.values() {
            let channel = &watched.channel;
            match verdict(now.duration_since(watched.last_pong), self.interval) {
                Verdict::Ping => {
                    channel.send_ping();
                }
                Verdict::Close => {
                    tracing::info!(channel = %channel.id(), peer = %channel.peer(), "player timed out");
                    channel.close(CloseStatusCode::ProtocolError, PLAYER_TIMEOUT);
                }
                Verdict::Terminate => {
                    tracing::warn!(channel = %channel.id(), peer = %channel.peer(), "dropping unresponsive connection");
                    channel.terminate();
                }
            }
        }
    }

    /// Tick every interval until the task is aborted
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
            loop {
                ticker.tick().await;
                self.tick().await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::tests::test_channel;
    use crate::channel::Outbound;

    const INTERVAL: Duration = Duration::from_secs(10);

    #[test]
    fn test_verdict() {
        assert_eq!(verdict(Duration::ZERO, INTERVAL), Verdict::Ping);
        assert_eq!(verdict(INTERVAL * 2, INTERVAL), Verdict::Ping);
        assert_eq!(verdict(INTERVAL * 2 + Duration::from_millis(1), INTERVAL), Verdict::Close);
        assert_eq!(verdict(INTERVAL * 3, INTERVAL), Verdict::Close);
        assert_eq!(verdict(INTERVAL * 3 + Duration::from_millis(1), INTERVAL), Verdict::Terminate);
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_player_is_closed_then_dropped() {
        let watcher = TimeoutWatcher::new(INTERVAL);
        let (channel, mut outbound) = test_channel(1);
        watcher.watch(&channel).await;

        tokio::time::advance(INTERVAL).await;
        watcher.tick().await;
        assert_eq!(outbound.try_recv().unwrap(), Outbound::Ping);

        tokio::time::advance(INTERVAL * 2).await;
        watcher.tick().await;
        assert_eq!(
            outbound.try_recv().unwrap(),
            Outbound::Close(1002, PLAYER_TIMEOUT.to_string())
        );

        tokio::time::advance(INTERVAL).await;
        watcher.tick().await;
        assert_eq!(outbound.try_recv().unwrap(), Outbound::Terminate);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pong_keeps_player() {
        let watcher = TimeoutWatcher::new(INTERVAL);
        let (channel, mut outbound) = test_channel(1);
        watcher.watch(&channel).await;

        for _ in 0..5 {
            tokio::time::advance(INTERVAL * 2).await;
            watcher.register_pong(&channel).await;
            watcher.tick().await;
            assert_eq!(outbound.try_recv().unwrap(), Outbound::Ping);
        }

        watcher.unwatch(&channel).await;
        assert!(watcher.is_empty().await);
        watcher.tick().await;
        assert!(outbound.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_watcher_pings() {
        let watcher = Arc::new(TimeoutWatcher::new(INTERVAL));
        let (channel, mut outbound) = test_channel(1);
        watcher.watch(&channel).await;
        let task = watcher.clone().spawn();

        assert_eq!(outbound.recv().await, Some(Outbound::Ping));
        task.abort();
    }
}
