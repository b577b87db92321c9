//! Error types for wire format operations.

use std::fmt;

use crate::packet::PacketId;

/// Result type for wire format operations.
pub type WireResult<T> = Result<T, DecodeError>;

/// Decode errors for packet framing and packet bodies.
///
/// Every variant is scoped to one packet: the caller drops the packet and
/// keeps the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// Bitstream error (a field ran past the end of the buffer).
    Bitstream(bitstream::BitError),

    /// Packet is too small to contain the required header.
    PacketTooSmall { actual: usize, required: usize },

    /// First byte is not the user-packet marker.
    InvalidMarker { found: u8 },

    /// Header names a packet kind with no registered deserializer.
    UnknownPacket { remote: u16, code: u32 },

    /// Limits exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },

    /// Embedded LDF payload is malformed.
    Ldf(ldf::LdfError),

    /// Whole bytes were left after the packet body.
    TrailingData { packet: PacketId, remaining: usize },
}

/// Specific wire limits that can be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    PacketBytes,
    PayloadBytes,
}

/// Errors that can occur during encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    Bitstream(bitstream::BitError),
    Ldf(ldf::LdfError),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bitstream(e) => write!(f, "bitstream error: {e}"),
            Self::PacketTooSmall { actual, required } => {
                write!(
                    f,
                    "packet too small: {actual} bytes, need at least {required}"
                )
            }
            Self::InvalidMarker { found } => {
                write!(f, "invalid packet marker: 0x{found:02X}")
            }
            Self::UnknownPacket { remote, code } => {
                write!(f, "unknown packet: remote {remote}, code 0x{code:02X}")
            }
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
            Self::Ldf(e) => write!(f, "ldf error: {e}"),
            Self::TrailingData { packet, remaining } => {
                write!(f, "{remaining} trailing bytes after {packet:?} body")
            }
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PacketBytes => "packet bytes",
            Self::PayloadBytes => "payload bytes",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bitstream(e) => write!(f, "bitstream error: {e}"),
            Self::Ldf(e) => write!(f, "ldf error: {e}"),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bitstream(e) => Some(e),
            Self::Ldf(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bitstream(e) => Some(e),
            Self::Ldf(e) => Some(e),
        }
    }
}

impl From<bitstream::BitError> for DecodeError {
    fn from(err: bitstream::BitError) -> Self {
        Self::Bitstream(err)
    }
}

impl From<ldf::LdfError> for DecodeError {
    fn from(err: ldf::LdfError) -> Self {
        Self::Ldf(err)
    }
}

impl From<bitstream::BitError> for EncodeError {
    fn from(err: bitstream::BitError) -> Self {
        Self::Bitstream(err)
    }
}

impl From<ldf::LdfError> for EncodeError {
    fn from(err: ldf::LdfError) -> Self {
        Self::Ldf(err)
    }
}
