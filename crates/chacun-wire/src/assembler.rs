//! Reassembly of fragmented data messages

use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::opcode::OpCode;

/// A complete data message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Text(String),
    Binary(Vec<u8>),
}

/// Collects data frames until the final fragment arrives
///
/// Control frames may be interleaved with fragments and never reach the
/// assembler.
#[derive(Debug)]
pub struct MessageAssembler {
    max_size: usize,
    kind: Option<OpCode>,
    buffer: Vec<u8>,
}

impl MessageAssembler {
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            kind: None,
            buffer: Vec::new(),
        }
    }

    /// Whether a fragmented message is in progress
    pub fn is_assembling(&self) -> bool {
        self.kind.is_some()
    }

    /// Add a data frame, returning the message it completes, if any
    pub fn push(&mut self, frame: Frame) -> Result<Option<Message>> {
        let kind = match (self.kind, frame.opcode) {
            (None, OpCode::Continuation) => return Err(Error::UnexpectedContinuation),
            (None, opcode) => opcode,
            (Some(kind), OpCode::Continuation) => kind,
            (Some(_), opcode) => return Err(Error::ExpectedContinuation(opcode)),
        };

        let size = self.buffer.len() + frame.payload.len();
        if size > self.max_size {
            return Err(Error::PayloadTooLarge {
                size: size as u64,
                max: self.max_size,
            });
        }

        if frame.fin && self.buffer.is_empty() {
            self.kind = None;
            return Self::finish(kind, frame.payload).map(Some);
        }

        self.buffer.extend_from_slice(&frame.payload);
        if !frame.fin {
            self.kind = Some(kind);
            return Ok(None);
        }

        self.kind = None;
        let payload = std::mem::take(&mut self.buffer);
        Self::finish(kind, payload).map(Some)
    }

    fn finish(kind: OpCode, payload: Vec<u8>) -> Result<Message> {
        match kind {
            OpCode::Text => Ok(Message::Text(String::from_utf8(payload)?)),
            _ => Ok(Message::Binary(payload)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(fin: bool, opcode: OpCode, payload: &[u8]) -> Frame {
        Frame {
            fin,
            opcode,
            payload: payload.to_vec(),
        }
    }

    #[test]
    fn test_single_frame() {
        let mut assembler = MessageAssembler::new(64);
        let message = assembler.push(frame(true, OpCode::Text, b"GAMELEAVE")).unwrap();
        assert_eq!(message, Some(Message::Text("GAMELEAVE".to_string())));
        assert!(!assembler.is_assembling());
    }

    #[test]
    fn test_fragments() {
        let mut assembler = MessageAssembler::new(64);
        assert_eq!(assembler.push(frame(false, OpCode::Text, b"GAME")).unwrap(), None);
        assert!(assembler.is_assembling());
        assert_eq!(assembler.push(frame(false, OpCode::Continuation, b"MSG.")).unwrap(), None);
        let message = assembler
            .push(frame(true, OpCode::Continuation, b"salut"))
            .unwrap();
        assert_eq!(message, Some(Message::Text("GAMEMSG.salut".to_string())));

        let message = assembler.push(frame(true, OpCode::Binary, &[1, 2])).unwrap();
        assert_eq!(message, Some(Message::Binary(vec![1, 2])));
    }

    #[test]
    fn test_sequence_errors() {
        let mut assembler = MessageAssembler::new(64);
        assert!(matches!(
            assembler.push(frame(true, OpCode::Continuation, b"x")),
            Err(Error::UnexpectedContinuation)
        ));
        assembler.push(frame(false, OpCode::Binary, b"x")).unwrap();
        assert!(matches!(
            assembler.push(frame(true, OpCode::Text, b"y")),
            Err(Error::ExpectedContinuation(OpCode::Text))
        ));
    }

    #[test]
    fn test_size_limit_spans_fragments() {
        let mut assembler = MessageAssembler::new(8);
        assembler.push(frame(false, OpCode::Text, b"12345")).unwrap();
        let err = assembler
            .push(frame(true, OpCode::Continuation, b"6789"))
            .unwrap_err();
        assert!(matches!(err, Error::PayloadTooLarge { size: 9, max: 8 }));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut assembler = MessageAssembler::new(8);
        let err = assembler
            .push(frame(true, OpCode::Text, &[0xff, 0xfe]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUtf8(_)));
        assert_eq!(err.close_code().as_u16(), 1007);
    }
}
