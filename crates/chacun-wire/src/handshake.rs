//! HTTP/1.1 opening handshake

use crate::error::{Error, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use regex::Regex;
use sha1::{Digest, Sha1};
use std::sync::LazyLock;

/// Magic string appended to the client key before hashing
pub const GUID: &str = "258EAFA5-E914-47DA-95CA-C5AB0DC85B11";

/// End of the request headers
pub const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Length of the request head, terminator included, once it is fully read
pub fn header_len(buf: &[u8]) -> Option<usize> {
    buf.windows(HEADER_TERMINATOR.len())
        .position(|window| window == HEADER_TERMINATOR)
        .map(|start| start + HEADER_TERMINATOR.len())
}

fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("handshake patterns are valid")
}

// Header names and the `websocket`/`Upgrade` tokens are case-insensitive.
static UPGRADE_CHECKS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        pattern(r"^GET /\S* HTTP/1\.1\r\n"),
        pattern(r"(?im)^upgrade:[ \t]*websocket[ \t]*\r$"),
        pattern(r"(?im)^connection:[^\r\n]*\bupgrade\b"),
        pattern(r"(?im)^sec-websocket-key:"),
    ]
});

static KEY_HEADER: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?im)^sec-websocket-key:[ \t]*([^\r\n]*)\r$"));

/// Whether the request asks to upgrade the root path to a WebSocket
///
/// `Connection` may list other tokens next to `Upgrade`.
pub fn is_upgrade_request(request: &str) -> bool {
    UPGRADE_CHECKS.iter().all(|check| check.is_match(request))
}

/// `Sec-WebSocket-Accept` value for a client key
pub fn accept_key(key: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(key.as_bytes());
    hasher.update(GUID.as_bytes());
    STANDARD.encode(hasher.finalize())
}

/// `101 Switching Protocols` response to an upgrade request
pub fn upgrade_response(request: &str) -> Result<String> {
    if !is_upgrade_request(request) {
        return Err(Error::NotAnUpgrade);
    }
    let key = KEY_HEADER
        .captures(request)
        .and_then(|captures| captures.get(1))
        .map(|key| key.as_str().trim())
        .filter(|key| !key.is_empty())
        .ok_or(Error::MissingKey)?;

    tracing::trace!(key, "Accepting WebSocket upgrade");
    Ok(format!(
        "HTTP/1.1 101 Switching Protocols\r\n\
         Upgrade: websocket\r\n\
         Connection: Upgrade\r\n\
         Sec-WebSocket-Accept: {}\r\n\r\n",
        accept_key(key)
    ))
}
