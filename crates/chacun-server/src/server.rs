//! TCP accept loop

use crate::channel::ChannelId;
use crate::config::ConnectionLimits;
use crate::connection::serve_connection;
use crate::error::Result;
use crate::handler::WebSocketHandler;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, ToSocketAddrs};

/// Accepts connections and serves each one on its own task
pub struct WebSocketServer<H> {
    listener: TcpListener,
    handler: Arc<H>,
    limits: ConnectionLimits,
}

impl<H: WebSocketHandler> WebSocketServer<H> {
    pub async fn bind(addr: impl ToSocketAddrs, handler: Arc<H>, limits: ConnectionLimits) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            handler,
            limits,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections forever
    pub async fn run(self) -> Result<()> {
        tracing::info!(addr = %self.local_addr()?, "listening");
        let mut next_id = 0u64;
        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(conn) => conn,
                Err(err) => {
                    tracing::warn!("accept error: {err}");
                    continue;
                }
            };
            next_id += 1;
            let id = ChannelId(next_id);
            let handler = self.handler.clone();
            let limits = self.limits;
            tokio::spawn(async move {
                if let Err(err) = serve_connection(stream, peer, id, &*handler, limits).await {
                    tracing::debug!(channel = %id, %peer, "connection ended with error: {err}");
                }
            });
        }
    }
}
