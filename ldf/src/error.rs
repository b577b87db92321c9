//! Error types for LDF encoding/decoding.

use std::fmt;

use crate::value::LdfType;

/// Result type for LDF operations.
pub type LdfResult<T> = Result<T, LdfError>;

/// Errors that can occur while building, encoding or decoding LDF data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LdfError {
    /// Bitstream error (truncated input).
    Bitstream(bitstream::BitError),

    /// Unknown type tag on the wire.
    UnknownType { tag: u8 },

    /// Value cannot be carried under the requested type tag.
    IncompatibleType { requested: LdfType, found: LdfType },

    /// Key does not fit the one-byte length prefix.
    KeyTooLong { bytes: usize },

    /// Key length prefix is odd and cannot hold UTF-16 code units.
    OddKeyLength { bytes: u8 },

    /// String data is not valid UTF-16.
    InvalidUtf16,

    /// Bool byte other than 0 or 1.
    InvalidBool { byte: u8 },

    /// Value is too long for its length prefix.
    ValueTooLong { len: usize },

    /// Limits exceeded while decoding.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },

    /// Framed length does not match the bytes that follow it.
    LengthMismatch { declared: u32, minimum: usize },

    /// Body had bytes left over after the declared entries.
    TrailingBytes { remaining: usize },

    /// Payload is compressed and cannot be decoded in place.
    Compressed,
}

/// Specific LDF limits that can be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    Entries,
    KeyBytes,
    ValueBytes,
    FramedBytes,
}

impl fmt::Display for LdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bitstream(e) => write!(f, "bitstream error: {e}"),
            Self::UnknownType { tag } => write!(f, "unknown ldf type tag {tag}"),
            Self::IncompatibleType { requested, found } => {
                write!(f, "cannot write {found:?} value as {requested:?}")
            }
            Self::KeyTooLong { bytes } => {
                write!(f, "key of {bytes} bytes does not fit a u8 length prefix")
            }
            Self::OddKeyLength { bytes } => {
                write!(f, "key length {bytes} is not a whole number of UTF-16 units")
            }
            Self::InvalidUtf16 => write!(f, "invalid UTF-16 string data"),
            Self::InvalidBool { byte } => write!(f, "bool byte {byte} is neither 0 nor 1"),
            Self::ValueTooLong { len } => write!(f, "value of length {len} is too long"),
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
            Self::LengthMismatch { declared, minimum } => {
                write!(
                    f,
                    "framed length {declared} is smaller than the {minimum}-byte frame"
                )
            }
            Self::TrailingBytes { remaining } => {
                write!(f, "{remaining} trailing bytes after ldf entries")
            }
            Self::Compressed => write!(f, "compressed ldf payload cannot be decoded"),
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Entries => "entry count",
            Self::KeyBytes => "key bytes",
            Self::ValueBytes => "value bytes",
            Self::FramedBytes => "framed bytes",
        };
        write!(f, "{name}")
    }
}

impl std::error::Error for LdfError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bitstream(e) => Some(e),
            _ => None,
        }
    }
}

impl From<bitstream::BitError> for LdfError {
    fn from(err: bitstream::BitError) -> Self {
        Self::Bitstream(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unknown_type() {
        let err = LdfError::UnknownType { tag: 42 };
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn display_limits_exceeded() {
        let err = LdfError::LimitsExceeded {
            kind: LimitKind::Entries,
            limit: 4,
            actual: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("entry count"));
        assert!(msg.contains("10"));
    }

    #[test]
    fn from_bitstream_error_keeps_source() {
        let err: LdfError = bitstream::BitError::TruncatedStream {
            requested: 8,
            available: 0,
        }
        .into();
        assert!(matches!(err, LdfError::Bitstream(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
