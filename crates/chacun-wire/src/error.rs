//! Error types for chacun-wire

use crate::opcode::{CloseStatusCode, OpCode};
use thiserror::Error;

/// WebSocket protocol error type
#[derive(Debug, Error)]
pub enum Error {
    /// RSV bits set without a negotiated extension
    #[error("Reserved bits set in frame header")]
    ReservedBits,

    /// Opcode 0x3-0x7 or 0xB-0xF
    #[error("Reserved opcode {0:#x}")]
    ReservedOpCode(u8),

    /// Close, ping or pong frame without the FIN bit
    #[error("Control frame {0:?} is fragmented")]
    FragmentedControlFrame(OpCode),

    /// Control frame announcing more than 125 payload bytes
    #[error("Control frame payload of {0} bytes exceeds 125")]
    ControlFrameTooLong(u64),

    /// Frame or reassembled message larger than the configured limit
    #[error("Payload of {size} bytes exceeds the limit of {max}")]
    PayloadTooLarge { size: u64, max: usize },

    /// Continuation frame received while no message is being assembled
    #[error("Continuation frame without a message to continue")]
    UnexpectedContinuation,

    /// New data frame received before the fragmented message ended
    #[error("Expected a continuation frame, got {0:?}")]
    ExpectedContinuation(OpCode),

    /// Text message or close reason that is not UTF-8
    #[error("Text message is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// Close payload of a single byte, too short for a status code
    #[error("Close frame payload of one byte")]
    TruncatedCloseCode,

    /// Close status code a peer may not put on the wire
    #[error("Close status code {0} cannot be sent by a peer")]
    InvalidCloseCode(u16),

    /// Request that is not a `GET` upgrade to `websocket`
    #[error("Not a WebSocket upgrade request")]
    NotAnUpgrade,

    /// Upgrade request with an empty `Sec-WebSocket-Key`
    #[error("Missing Sec-WebSocket-Key header")]
    MissingKey,
}

impl Error {
    /// Status code to close the connection with after this error
    pub fn close_code(&self) -> CloseStatusCode {
        match self {
            Error::PayloadTooLarge { .. } => CloseStatusCode::MessageTooBig,
            Error::InvalidUtf8(_) => CloseStatusCode::InvalidFramePayloadData,
            _ => CloseStatusCode::ProtocolError,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
