//! Handle on one WebSocket connection

use chacun_wire::CloseStatusCode;
use std::fmt;
use std::net::SocketAddr;
use tokio::sync::mpsc;

/// Unique id of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChannelId(pub u64);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What the writer task should do next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Text(String),
    Ping,
    Pong(Vec<u8>),
    /// Send a close frame, then stop writing
    Close(u16, String),
    /// Drop the connection without a close frame
    Terminate,
}

/// Cloneable handle used to send to a connection from anywhere
///
/// Sending never blocks. Once the connection is gone, sends are dropped
/// and report `false`.
#[derive(Debug, Clone)]
pub struct WebSocketChannel {
    id: ChannelId,
    peer: SocketAddr,
    outbound: mpsc::UnboundedSender<Outbound>,
}

impl WebSocketChannel {
    pub fn new(id: ChannelId, peer: SocketAddr, outbound: mpsc::UnboundedSender<Outbound>) -> Self {
        Self { id, peer, outbound }
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    pub fn is_open(&self) -> bool {
        !self.outbound.is_closed()
    }

    fn push(&self, message: Outbound) -> bool {
        self.outbound.send(message).is_ok()
    }

    pub fn send_text(&self, text: impl Into<String>) -> bool {
        self.push(Outbound::Text(text.into()))
    }

    pub fn send_ping(&self) -> bool {
        self.push(Outbound::Ping)
    }

    pub fn send_pong(&self, payload: &[u8]) -> bool {
        self.push(Outbound::Pong(payload.to_vec()))
    }

    pub fn close(&self, code: CloseStatusCode, reason: &str) -> bool {
        self.close_raw(code.as_u16(), reason)
    }

    pub(crate) fn close_raw(&self, code: u16, reason: &str) -> bool {
        self.push(Outbound::Close(code, reason.to_string()))
    }

    pub fn terminate(&self) -> bool {
        self.push(Outbound::Terminate)
    }
}

impl PartialEq for WebSocketChannel {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for WebSocketChannel {}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Channel backed by a queue the test reads
    pub(crate) fn test_channel(id: u64) -> (WebSocketChannel, mpsc::UnboundedReceiver<Outbound>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let peer = SocketAddr::from(([127, 0, 0, 1], 40_000 + id as u16));
        (WebSocketChannel::new(ChannelId(id), peer, sender), receiver)
    }

    #[test]
    fn test_send() {
        let (channel, mut receiver) = test_channel(1);
        assert!(channel.send_text("GAMEMSG.a=b"));
        assert!(channel.send_ping());
        assert!(channel.send_pong(b"x"));
        assert!(channel.close(CloseStatusCode::ProtocolError, "PLAYER_TIMEOUT"));
        assert!(channel.terminate());

        assert_eq!(receiver.try_recv().unwrap(), Outbound::Text("GAMEMSG.a=b".into()));
        assert_eq!(receiver.try_recv().unwrap(), Outbound::Ping);
        assert_eq!(receiver.try_recv().unwrap(), Outbound::Pong(b"x".to_vec()));
        assert_eq!(
            receiver.try_recv().unwrap(),
            Outbound::Close(1002, "PLAYER_TIMEOUT".into())
        );
        assert_eq!(receiver.try_recv().unwrap(), Outbound::Terminate);
    }

    #[test]
    fn test_send_after_disconnect() {
        let (channel, receiver) = test_channel(2);
        drop(receiver);
        assert!(!channel.is_open());
        assert!(!channel.send_text("lost"));
        assert_eq!(channel, channel.clone());
    }
}
