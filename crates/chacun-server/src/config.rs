//! RON configuration for the game server
//!
//! Every field is optional:
//!
//! ```ron
//! ServerConfig(
//!     listen: "0.0.0.0:3000",
//!     ping_interval_ms: 30000,
//!     tiles: Some("tiles.ron"),
//! )
//! ```

use crate::error::{Error, Result};
use chacun_game::TileCatalogue;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "127.0.0.1:3000")
    #[serde(default = "default_listen")]
    pub listen: String,
    /// Delay between two pings, and how long a player may stay silent
    #[serde(default = "default_ping_interval")]
    pub ping_interval_ms: u64,
    /// Largest message accepted, fragments included
    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,
    /// Largest HTTP upgrade request accepted
    #[serde(default = "default_max_handshake_size")]
    pub max_handshake_size: usize,
    /// Tile catalogue to play with, the built-in one when absent
    #[serde(default)]
    pub tiles: Option<PathBuf>,
    /// Runtime worker threads, clamped to `[1, num_cpus]`
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,
}

fn default_listen() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_ping_interval() -> u64 {
    60_000
}

fn default_max_message_size() -> usize {
    4096
}

fn default_max_handshake_size() -> usize {
    8192
}

fn default_worker_threads() -> usize {
    num_cpus::get()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            ping_interval_ms: default_ping_interval(),
            max_message_size: default_max_message_size(),
            max_handshake_size: default_max_handshake_size(),
            tiles: None,
            worker_threads: default_worker_threads(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_ron_str(&content)
    }

    pub fn from_ron_str(content: &str) -> Result<Self> {
        Ok(ron::from_str(content)?)
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen
            .parse()
            .map_err(|_| Error::ListenAddress(self.listen.clone()))
    }

    pub fn ping_interval(&self) -> Duration {
        Duration::from_millis(self.ping_interval_ms.max(1))
    }

    pub fn worker_threads(&self) -> usize {
        self.worker_threads.clamp(1, num_cpus::get())
    }

    /// The configured tile catalogue, or the built-in one
    pub fn catalogue(&self) -> Result<TileCatalogue> {
        let catalogue = match &self.tiles {
            Some(path) => TileCatalogue::load(path)?,
            None => TileCatalogue::builtin()?,
        };
        Ok(catalogue)
    }

    pub fn limits(&self) -> ConnectionLimits {
        ConnectionLimits {
            max_message_size: self.max_message_size,
            max_handshake_size: self.max_handshake_size,
        }
    }
}

/// Size limits applied to each connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionLimits {
    pub max_message_size: usize,
    pub max_handshake_size: usize,
}

impl Default for ConnectionLimits {
    fn default() -> Self {
        ServerConfig::default().limits()
    }
}
