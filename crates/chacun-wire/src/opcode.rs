//! Frame opcodes and close status codes

/// Frame opcode (4 bits)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    Continuation,
    Text,
    Binary,
    Close,
    Ping,
    Pong,
    /// Any value RFC 6455 leaves reserved
    Reserved(u8),
}

impl OpCode {
    /// Control frames have the high bit of the opcode set
    pub fn is_control(self) -> bool {
        u8::from(self) & 0x8 != 0
    }
}

impl From<u8> for OpCode {
    fn from(value: u8) -> Self {
        match value & 0x0F {
            0x0 => OpCode::Continuation,
            0x1 => OpCode::Text,
            0x2 => OpCode::Binary,
            0x8 => OpCode::Close,
            0x9 => OpCode::Ping,
            0xA => OpCode::Pong,
            other => OpCode::Reserved(other),
        }
    }
}

impl From<OpCode> for u8 {
    fn from(opcode: OpCode) -> Self {
        match opcode {
            OpCode::Continuation => 0x0,
            OpCode::Text => 0x1,
            OpCode::Binary => 0x2,
            OpCode::Close => 0x8,
            OpCode::Ping => 0x9,
            OpCode::Pong => 0xA,
            OpCode::Reserved(value) => value & 0x0F,
        }
    }
}

/// Status codes sent in close frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseStatusCode {
    NormalClosure,
    GoingAway,
    ProtocolError,
    UnsupportedData,
    Reserved,
    NoStatusReceived,
    AbnormalClosure,
    InvalidFramePayloadData,
    PolicyViolation,
    MessageTooBig,
    MandatoryExtension,
    InternalError,
    TlsHandshake,
}

impl CloseStatusCode {
    pub const ALL: [CloseStatusCode; 13] = [
        CloseStatusCode::NormalClosure,
        CloseStatusCode::GoingAway,
        CloseStatusCode::ProtocolError,
        CloseStatusCode::UnsupportedData,
        CloseStatusCode::Reserved,
        CloseStatusCode::NoStatusReceived,
        CloseStatusCode::AbnormalClosure,
        CloseStatusCode::InvalidFramePayloadData,
        CloseStatusCode::PolicyViolation,
        CloseStatusCode::MessageTooBig,
        CloseStatusCode::MandatoryExtension,
        CloseStatusCode::InternalError,
        CloseStatusCode::TlsHandshake,
    ];

    pub fn as_u16(self) -> u16 {
        match self {
            CloseStatusCode::NormalClosure => 1000,
            CloseStatusCode::GoingAway => 1001,
            CloseStatusCode::ProtocolError => 1002,
            CloseStatusCode::UnsupportedData => 1003,
            CloseStatusCode::Reserved => 1004,
            CloseStatusCode::NoStatusReceived => 1005,
            CloseStatusCode::AbnormalClosure => 1006,
            CloseStatusCode::InvalidFramePayloadData => 1007,
            CloseStatusCode::PolicyViolation => 1008,
            CloseStatusCode::MessageTooBig => 1009,
            CloseStatusCode::MandatoryExtension => 1010,
            CloseStatusCode::InternalError => 1011,
            CloseStatusCode::TlsHandshake => 1015,
        }
    }

    pub fn from_u16(code: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_u16() == code)
    }

    /// Whether a peer may send `code` in a close frame
    ///
    /// 1004, 1005, 1006 and 1015 are reserved for local use. Codes 3000 to
    /// 4999 belong to libraries and applications.
    pub fn is_sendable(code: u16) -> bool {
        matches!(code, 1000..=1003 | 1007..=1014 | 3000..=4999)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_values() {
        for value in [0x0, 0x1, 0x2, 0x8, 0x9, 0xA] {
            assert_eq!(u8::from(OpCode::from(value)), value);
        }
        assert_eq!(OpCode::from(0x3), OpCode::Reserved(0x3));
        assert_eq!(OpCode::from(0xB), OpCode::Reserved(0xB));
    }

    #[test]
    fn test_control_opcodes() {
        assert!(OpCode::Close.is_control());
        assert!(OpCode::Ping.is_control());
        assert!(OpCode::Pong.is_control());
        assert!(!OpCode::Text.is_control());
        assert!(!OpCode::Continuation.is_control());
    }

    #[test]
    fn test_close_codes() {
        assert_eq!(CloseStatusCode::ProtocolError.as_u16(), 1002);
        assert_eq!(CloseStatusCode::TlsHandshake.as_u16(), 1015);
        assert_eq!(CloseStatusCode::from_u16(1009), Some(CloseStatusCode::MessageTooBig));
        assert_eq!(CloseStatusCode::from_u16(1012), None);
    }

    #[test]
    fn test_sendable_close_codes() {
        for code in [1000, 1001, 1002, 1003, 1007, 1011, 1014, 3000, 4999] {
            assert!(CloseStatusCode::is_sendable(code), "{code}");
        }
        for code in [0, 999, 1004, 1005, 1006, 1015, 1016, 2999, 5000] {
            assert!(!CloseStatusCode::is_sendable(code), "{code}");
        }
    }
}
