//! Callbacks invoked by the connection loop

use crate::channel::WebSocketChannel;
use std::future::Future;

/// Application side of a WebSocket server
///
/// For a given connection, `on_open` runs first and `on_close` runs
/// exactly once, last. Callbacks of one connection never overlap.
pub trait WebSocketHandler: Send + Sync + 'static {
    fn on_open(&self, channel: &WebSocketChannel) -> impl Future<Output = ()> + Send;

    fn on_message(&self, channel: &WebSocketChannel, message: String) -> impl Future<Output = ()> + Send;

    fn on_binary(&self, channel: &WebSocketChannel, data: Vec<u8>) -> impl Future<Output = ()> + Send {
        let _ = (channel, data);
        async {}
    }

    fn on_ping(&self, channel: &WebSocketChannel, payload: Vec<u8>) -> impl Future<Output = ()> + Send {
        channel.send_pong(&payload);
        async {}
    }

    fn on_pong(&self, channel: &WebSocketChannel, payload: Vec<u8>) -> impl Future<Output = ()> + Send {
        let _ = (channel, payload);
        async {}
    }

    fn on_close(&self, channel: &WebSocketChannel) -> impl Future<Output = ()> + Send;
}
