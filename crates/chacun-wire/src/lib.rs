//! ChaCuN Wire - RFC 6455 WebSocket codec
//!
//! This crate provides the server side of the WebSocket protocol, with no
//! I/O of its own:
//! - The HTTP/1.1 opening handshake (`upgrade_response`)
//! - Frame parsing from a byte buffer and frame encoding
//! - Opcodes and close status codes
//! - Reassembly of fragmented messages
//!
//! Extensions are not negotiated, so frames with RSV bits set are
//! protocol errors.

mod assembler;
mod error;
pub mod frame;
pub mod handshake;
mod opcode;

pub use assembler::{Message, MessageAssembler};
pub use error::{Error, Result};
pub use frame::{parse_frame, Frame, Parsed};
pub use handshake::{accept_key, is_upgrade_request, upgrade_response};
pub use opcode::{CloseStatusCode, OpCode};
