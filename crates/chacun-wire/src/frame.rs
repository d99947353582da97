//! Frame parsing and encoding
//!
//! ```text
//!  0               1               2               3
//!  0 1 2 3 4 5 6 7 0 1 2 3 4 5 6 7 0 1 2 3 4 5 6 7 0 1 2 3 4 5 6 7
//! +-+-+-+-+-------+-+-------------+-------------------------------+
//! |F|R|R|R| opcode|M| Payload len |    Extended payload length    |
//! |I|S|S|S|  (4)  |A|     (7)     |             (16/64)           |
//! |N|V|V|V|       |S|             |   (if payload len==126/127)   |
//! | |1|2|3|       |K|             |                               |
//! +-+-+-+-+-------+-+-------------+-------------------------------+
//! |                               |  Masking-key, if MASK set     |
//! +-------------------------------+-------------------------------+
//! ```

use crate::error::{Error, Result};
use crate::opcode::{CloseStatusCode, OpCode};

const FIN: u8 = 0x80;
const RSV: u8 = 0x70;
const MASK: u8 = 0x80;
const LEN_16: u8 = 126;
const LEN_64: u8 = 127;

/// Largest payload a control frame may carry
pub const MAX_CONTROL_PAYLOAD: usize = 125;

/// Empty ping frame
pub const PING: [u8; 2] = [FIN | 0x9, 0];

/// Empty pong frame
pub const PONG: [u8; 2] = [FIN | 0xA, 0];

/// A decoded frame with its payload unmasked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub fin: bool,
    pub opcode: OpCode,
    pub payload: Vec<u8>,
}

impl Frame {
    /// Status code and reason carried by a close frame
    ///
    /// An empty payload carries neither. A one-byte payload, a code no peer
    /// may send, or a reason that is not UTF-8 is an error.
    pub fn close_reason(&self) -> Result<Option<(u16, String)>> {
        if self.opcode != OpCode::Close {
            return Ok(None);
        }
        let (code, reason) = match self.payload.as_slice() {
            [] => return Ok(None),
            [_] => return Err(Error::TruncatedCloseCode),
            [high, low, reason @ ..] => (u16::from_be_bytes([*high, *low]), reason),
        };
        if !CloseStatusCode::is_sendable(code) {
            return Err(Error::InvalidCloseCode(code));
        }
        Ok(Some((code, String::from_utf8(reason.to_vec())?)))
    }
}

/// Outcome of parsing the start of a buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    /// More bytes are needed
    Incomplete,
    /// A frame and the number of bytes it used
    Complete { frame: Frame, consumed: usize },
}

/// Parse one frame from the start of `buf`
///
/// Payloads larger than `max_payload` are rejected as soon as the header
/// is known, before the payload arrives.
pub fn parse_frame(buf: &[u8], max_payload: usize) -> Result<Parsed> {
    let &[first, second, ..] = buf else {
        return Ok(Parsed::Incomplete);
    };

    if first & RSV != 0 {
        return Err(Error::ReservedBits);
    }
    let fin = first & FIN != 0;
    let opcode = OpCode::from(first);
    if let OpCode::Reserved(value) = opcode {
        return Err(Error::ReservedOpCode(value));
    }

    let masked = second & MASK != 0;
    let (length, mut offset) = match second & !MASK {
        LEN_16 => {
            let Some(bytes) = buf.get(2..4) else {
                return Ok(Parsed::Incomplete);
            };
            (u64::from(u16::from_be_bytes([bytes[0], bytes[1]])), 4)
        }
        LEN_64 => {
            let Some(bytes) = buf.get(2..10) else {
                return Ok(Parsed::Incomplete);
            };
            let mut be = [0u8; 8];
            be.copy_from_slice(bytes);
            (u64::from_be_bytes(be), 10)
        }
        short => (u64::from(short), 2),
    };

    if opcode.is_control() {
        if !fin {
            return Err(Error::FragmentedControlFrame(opcode));
        }
        if length > MAX_CONTROL_PAYLOAD as u64 {
            return Err(Error::ControlFrameTooLong(length));
        }
    }
    if length > max_payload as u64 {
        return Err(Error::PayloadTooLarge {
            size: length,
            max: max_payload,
        });
    }
    // length <= max_payload, so it fits in usize
    let length = length as usize;

    let mask = if masked {
        let Some(bytes) = buf.get(offset..offset + 4) else {
            return Ok(Parsed::Incomplete);
        };
        offset += 4;
        Some([bytes[0], bytes[1], bytes[2], bytes[3]])
    } else {
        None
    };

    let Some(data) = buf.get(offset..offset + length) else {
        return Ok(Parsed::Incomplete);
    };
    let mut payload = data.to_vec();
    if let Some(mask) = mask {
        apply_mask(&mut payload, mask);
    }

    Ok(Parsed::Complete {
        frame: Frame {
            fin,
            opcode,
            payload,
        },
        consumed: offset + length,
    })
}

fn apply_mask(payload: &mut [u8], mask: [u8; 4]) {
    for (i, byte) in payload.iter_mut().enumerate() {
        *byte ^= mask[i % 4];
    }
}

fn encode(fin: bool, opcode: OpCode, payload: &[u8], mask: Option<[u8; 4]>) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 14);
    out.push(if fin { FIN } else { 0 } | u8::from(opcode));

    let mask_bit = if mask.is_some() { MASK } else { 0 };
    match payload.len() {
        len if len <= MAX_CONTROL_PAYLOAD => out.push(mask_bit | len as u8),
        len if len <= u16::MAX as usize => {
            out.push(mask_bit | LEN_16);
            out.extend_from_slice(&(len as u16).to_be_bytes());
        }
        len => {
            out.push(mask_bit | LEN_64);
            out.extend_from_slice(&(len as u64).to_be_bytes());
        }
    }

    match mask {
        Some(mask) => {
            out.extend_from_slice(&mask);
            let start = out.len();
            out.extend_from_slice(payload);
            apply_mask(&mut out[start..], mask);
        }
        None => out.extend_from_slice(payload),
    }
    out
}

/// Unmasked, final text frame
pub fn encode_text(message: &str) -> Vec<u8> {
    encode(true, OpCode::Text, message.as_bytes(), None)
}

/// Unmasked, final binary frame
pub fn encode_binary(data: &[u8]) -> Vec<u8> {
    encode(true, OpCode::Binary, data, None)
}

/// Close frame with a status code and a reason
///
/// The reason is cut on a character boundary so the payload fits in a
/// control frame.
pub fn encode_close(code: CloseStatusCode, reason: &str) -> Vec<u8> {
    encode_close_raw(code.as_u16(), reason)
}

/// Close frame with a raw status code, used to echo the peer's code
pub fn encode_close_raw(code: u16, reason: &str) -> Vec<u8> {
    let mut end = reason.len().min(MAX_CONTROL_PAYLOAD - 2);
    while !reason.is_char_boundary(end) {
        end -= 1;
    }
    let mut payload = code.to_be_bytes().to_vec();
    payload.extend_from_slice(&reason.as_bytes()[..end]);
    encode(true, OpCode::Close, &payload, None)
}

/// Pong answering a ping, echoing its payload
pub fn encode_pong(payload: &[u8]) -> Vec<u8> {
    encode(true, OpCode::Pong, payload, None)
}

/// Masked frame, as sent by clients
pub fn encode_masked(fin: bool, opcode: OpCode, payload: &[u8], mask: [u8; 4]) -> Vec<u8> {
    encode(fin, opcode, payload, Some(mask))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: usize = 4096;

    fn complete(buf: &[u8]) -> (Frame, usize) {
        match parse_frame(buf, MAX).unwrap() {
            Parsed::Complete { frame, consumed } => (frame, consumed),
            Parsed::Incomplete => panic!("frame is incomplete"),
        }
    }

    #[test]
    fn test_parse_masked_hello() {
        // Example from RFC 6455 section 5.7
        let buf = [0x81, 0x85, 0x37, 0xfa, 0x21, 0x3d, 0x7f, 0x9f, 0x4d, 0x51, 0x58];
        let (frame, consumed) = complete(&buf);
        assert!(frame.fin);
        assert_eq!(frame.opcode, OpCode::Text);
        assert_eq!(frame.payload, b"Hello");
        assert_eq!(consumed, buf.len());
    }

    #[test]
    fn test_parse_unmasked_and_trailing_bytes() {
        let mut buf = encode_text("Hello");
        assert_eq!(buf, [0x81u8, 0x05, 0x48, 0x65, 0x6c, 0x6c, 0x6f]);
        buf.extend_from_slice(&PING);
        let (frame, consumed) = complete(&buf);
        assert_eq!(frame.payload, b"Hello");
        assert_eq!(consumed, 7);

        let (ping, _) = complete(&buf[consumed..]);
        assert_eq!(ping.opcode, OpCode::Ping);
        assert!(ping.payload.is_empty());
    }

    #[test]
    fn test_incomplete() {
        let buf = encode_masked(true, OpCode::Text, b"GAMEMSG.salut", [1, 2, 3, 4]);
        for end in 0..buf.len() {
            assert_eq!(parse_frame(&buf[..end], MAX).unwrap(), Parsed::Incomplete);
        }
        let (frame, _) = complete(&buf);
        assert_eq!(frame.payload, b"GAMEMSG.salut");
    }

    #[test]
    fn test_extended_lengths() {
        let medium = "a".repeat(300);
        let buf = encode_text(&medium);
        assert_eq!(buf[1], 126);
        assert_eq!(&buf[2..4], &300u16.to_be_bytes());
        assert_eq!(complete(&buf).0.payload.len(), 300);

        let large = vec![7u8; 70_000];
        let buf = encode_masked(true, OpCode::Binary, &large, [9, 8, 7, 6]);
        assert_eq!(buf[1], 0x80 | 127);
        match parse_frame(&buf, 100_000).unwrap() {
            Parsed::Complete { frame, consumed } => {
                assert_eq!(frame.payload, large);
                assert_eq!(consumed, buf.len());
            }
            Parsed::Incomplete => panic!("frame is incomplete"),
        }
    }

    #[test]
    fn test_payload_too_large() {
        let buf = encode_text(&"a".repeat(MAX + 1));
        // The header alone is enough to reject the frame.
        let err = parse_frame(&buf[..4], MAX).unwrap_err();
        assert!(matches!(err, Error::PayloadTooLarge { size, .. } if size == MAX as u64 + 1));
        assert_eq!(err.close_code(), CloseStatusCode::MessageTooBig);
    }

    #[test]
    fn test_protocol_errors() {
        assert!(matches!(
            parse_frame(&[0xC1, 0x00], MAX),
            Err(Error::ReservedBits)
        ));
        assert!(matches!(
            parse_frame(&[0x83, 0x00], MAX),
            Err(Error::ReservedOpCode(0x3))
        ));
        assert!(matches!(
            parse_frame(&[0x09, 0x00], MAX),
            Err(Error::FragmentedControlFrame(OpCode::Ping))
        ));
        assert!(matches!(
            parse_frame(&[0x89, 126, 0, 200], MAX),
            Err(Error::ControlFrameTooLong(200))
        ));
    }

    #[test]
    fn test_close_frame() {
        let buf = encode_close(CloseStatusCode::ProtocolError, "PLAYER_TIMEOUT");
        assert_eq!(&buf[..4], &[0x88u8, 16, 0x03, 0xEA]);
        let (frame, _) = complete(&buf);
        assert_eq!(
            frame.close_reason().unwrap(),
            Some((1002, "PLAYER_TIMEOUT".to_string()))
        );

        let long = "é".repeat(100);
        let (frame, _) = complete(&encode_close(CloseStatusCode::NormalClosure, &long));
        assert!(frame.payload.len() <= MAX_CONTROL_PAYLOAD);
        assert!(frame.close_reason().unwrap().unwrap().1.chars().all(|c| c == 'é'));
    }

    fn close_with_payload(payload: &[u8]) -> Frame {
        Frame {
            fin: true,
            opcode: OpCode::Close,
            payload: payload.to_vec(),
        }
    }

    #[test]
    fn test_invalid_close_payloads() {
        assert_eq!(close_with_payload(&[]).close_reason().unwrap(), None);

        let err = close_with_payload(&[0x03]).close_reason().unwrap_err();
        assert!(matches!(err, Error::TruncatedCloseCode));
        assert_eq!(err.close_code(), CloseStatusCode::ProtocolError);

        for code in [1005u16, 1006, 1015, 999] {
            let err = close_with_payload(&code.to_be_bytes()).close_reason().unwrap_err();
            assert!(matches!(err, Error::InvalidCloseCode(c) if c == code));
            assert_eq!(err.close_code(), CloseStatusCode::ProtocolError);
        }

        let err = close_with_payload(&[0x03, 0xE8, 0xFF]).close_reason().unwrap_err();
        assert_eq!(err.close_code(), CloseStatusCode::InvalidFramePayloadData);

        assert_eq!(
            close_with_payload(&[0x0F, 0xA0]).close_reason().unwrap(),
            Some((4000, String::new()))
        );
    }

    #[test]
    fn test_pong_echoes_payload() {
        let (frame, _) = complete(&encode_pong(b"abc"));
        assert_eq!(frame.opcode, OpCode::Pong);
        assert_eq!(frame.payload, b"abc");
        assert_eq!(complete(&PONG).0.opcode, OpCode::Pong);
    }
}
