//! End-to-end sessions over real sockets

use chacun_game::test_support::short_catalogue;
use chacun_server::{ConnectionLimits, GameServer, WebSocketServer};
use chacun_wire::{frame, handshake, CloseStatusCode, Frame, OpCode, Parsed};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

const KEY: &str = "dGhlIHNhbXBsZSBub25jZQ==";
const READ_TIMEOUT: Duration = Duration::from_secs(5);

async fn start_server(limits: ConnectionLimits) -> SocketAddr {
    let catalogue = Arc::new(short_catalogue());
    let game_server = Arc::new(GameServer::new(catalogue, Duration::from_secs(60)));
    let server = WebSocketServer::bind("127.0.0.1:0", game_server, limits)
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());
    addr
}

struct Client {
    stream: TcpStream,
    buf: Vec<u8>,
}

impl Client {
    async fn connect(addr: SocketAddr) -> Self {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!(
            "GET / HTTP/1.1\r\nHost: {addr}\r\nUpgrade: websocket\r\nConnection: Upgrade\r\n\
             Sec-WebSocket-Key: {KEY}\r\nSec-WebSocket-Version: 13\r\n\r\n"
        );
        stream.write_all(request.as_bytes()).await.unwrap();

        let mut buf = Vec::new();
        let head_len = loop {
            if let Some(len) = handshake::header_len(&buf) {
                break len;
            }
            let mut chunk = [0u8; 512];
            let read = timeout(READ_TIMEOUT, stream.read(&mut chunk))
                .await
                .unwrap()
                .unwrap();
            assert!(read > 0, "server closed during the handshake");
            buf.extend_from_slice(&chunk[..read]);
        };
        let response = String::from_utf8_lossy(&buf[..head_len]).into_owned();
        assert!(response.starts_with("HTTP/1.1 101 Switching Protocols\r\n"));
        let accept = format!("Sec-WebSocket-Accept: {}\r\n", handshake::accept_key(KEY));
        assert!(response.contains(&accept));

        Self {
            stream,
            buf: buf.split_off(head_len),
        }
    }

    async fn send_frame(&mut self, opcode: OpCode, payload: &[u8]) {
        let bytes = frame::encode_masked(true, opcode, payload, [0x12, 0x34, 0x56, 0x78]);
        self.stream.write_all(&bytes).await.unwrap();
    }

    async fn send(&mut self, text: &str) {
        self.send_frame(OpCode::Text, text.as_bytes()).await;
    }

    /// Next frame, or `None` once the server has closed the socket
    async fn frame(&mut self) -> Option<Frame> {
        loop {
            if let Parsed::Complete { frame, consumed } = frame::parse_frame(&self.buf, usize::MAX).unwrap() {
                self.buf.drain(..consumed);
                return Some(frame);
            }
            let mut chunk = [0u8; 1024];
            let read = timeout(READ_TIMEOUT, self.stream.read(&mut chunk))
                .await
                .unwrap()
                .ok()?;
            if read == 0 {
                return None;
            }
            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    async fn text(&mut self) -> String {
        let frame = self.frame().await.unwrap();
        assert_eq!(frame.opcode, OpCode::Text);
        String::from_utf8(frame.payload).unwrap()
    }
}

#[tokio::test]
async fn test_two_player_game() {
    let addr = start_server(ConnectionLimits::default()).await;
    let mut alice = Client::connect(addr).await;
    let mut bob = Client::connect(addr).await;

    alice.send("GAMEJOIN.partie,alice").await;
    assert_eq!(alice.text().await, "GAMEJOIN_ACCEPT.alice");
    bob.send("GAMEJOIN.partie,bob").await;
    assert_eq!(alice.text().await, "GAMEJOIN_ACCEPT.alice,bob");
    assert_eq!(bob.text().await, "GAMEJOIN_ACCEPT.alice,bob");

    bob.send("GAMEMSG.bonne chance").await;
    assert_eq!(alice.text().await, "GAMEMSG.bob=bonne chance");
    assert_eq!(bob.text().await, "GAMEMSG.bob=bonne chance");

    alice.send("GAMEACTION.AM").await;
    assert_eq!(alice.text().await, "GAMEACTION_ACCEPT.AM");
    assert_eq!(bob.text().await, "GAMEACTION_ACCEPT.AM");

    bob.send("GAMEACTION.7").await;
    assert_eq!(bob.text().await, "GAMEACTION_DENY.NOT_YOUR_TURN");

    alice.send("GAMEACTION.7").await;
    assert_eq!(alice.text().await, "GAMEEND.PLAYER_HAS_WON");
    assert_eq!(bob.text().await, "GAMEEND.PLAYER_HAS_WON");

    // Closing is echoed, and the others learn the player left.
    bob.send_frame(OpCode::Close, &1000u16.to_be_bytes()).await;
    let echo = bob.frame().await.unwrap();
    assert_eq!(echo.close_reason().unwrap().map(|(code, _)| code), Some(1000));
    assert_eq!(alice.text().await, "GAMELEAVE.alice");
}

#[tokio::test]
async fn test_ping_and_fragments() {
    let addr = start_server(ConnectionLimits::default()).await;
    let mut alice = Client::connect(addr).await;

    alice.send_frame(OpCode::Ping, b"hello").await;
    let pong = alice.frame().await.unwrap();
    assert_eq!(pong.opcode, OpCode::Pong);
    assert_eq!(pong.payload, b"hello");

    let first = frame::encode_masked(false, OpCode::Text, b"GAMEJOIN.par", [1, 2, 3, 4]);
    let last = frame::encode_masked(true, OpCode::Continuation, b"tie,alice", [5, 6, 7, 8]);
    alice.stream.write_all(&first).await.unwrap();
    alice.stream.write_all(&last).await.unwrap();
    assert_eq!(alice.text().await, "GAMEJOIN_ACCEPT.alice");
}

#[tokio::test]
async fn test_oversized_message_is_refused() {
    let limits = ConnectionLimits {
        max_message_size: 64,
        ..ConnectionLimits::default()
    };
    let addr = start_server(limits).await;
    let mut alice = Client::connect(addr).await;

    alice.send(&format!("GAMEMSG.{}", "a".repeat(100))).await;
    let close = alice.frame().await.unwrap();
    assert_eq!(close.opcode, OpCode::Close);
    assert_eq!(
        close.close_reason().unwrap().map(|(code, _)| code),
        Some(CloseStatusCode::MessageTooBig.as_u16())
    );
    assert!(alice.frame().await.is_none());
}

#[tokio::test]
async fn test_invalid_utf8_is_refused() {
    let addr = start_server(ConnectionLimits::default()).await;
    let mut alice = Client::connect(addr).await;

    alice.send_frame(OpCode::Text, &[0x47, 0xff, 0xfe]).await;
    let close = alice.frame().await.unwrap();
    assert_eq!(
        close.close_reason().unwrap().map(|(code, _)| code),
        Some(CloseStatusCode::InvalidFramePayloadData.as_u16())
    );
}

#[tokio::test]
async fn test_plain_http_is_dropped() {
    let addr = start_server(ConnectionLimits::default()).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n")
        .await
        .unwrap();
    let mut buf = [0u8; 64];
    let read = timeout(READ_TIMEOUT, stream.read(&mut buf))
        .await
        .unwrap()
        .unwrap_or(0);
    assert_eq!(read, 0);
}
