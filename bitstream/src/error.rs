//! Codec errors.

use std::fmt;

/// Result alias for codec operations.
pub type BitResult<T> = Result<T, BitError>;

/// Failure of a bit-level read or write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitError {
    /// A read ran past the end of the buffer.
    ///
    /// Ends processing of the current packet; the connection stays up.
    TruncatedStream {
        /// Bits the read needed.
        requested: usize,
        /// Bits left in the buffer.
        available: usize,
    },

    /// A raw field width outside `1..=max_bits`.
    InvalidBitCount { bits: usize, max_bits: usize },

    /// A raw field value wider than its declared width.
    ValueOutOfRange { value: u64, bits: usize },
}

impl fmt::Display for BitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TruncatedStream {
                requested,
                available,
            } => write!(
                f,
                "stream truncated: needed {requested} bits, {available} left"
            ),
            Self::InvalidBitCount { bits, max_bits } => {
                write!(f, "field width {bits} is outside 1..={max_bits}")
            }
            Self::ValueOutOfRange { value, bits } => {
                write!(f, "{value} does not fit in a {bits}-bit field")
            }
        }
    }
}

impl std::error::Error for BitError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_reports_both_counts() {
        let msg = BitError::TruncatedStream {
            requested: 64,
            available: 12,
        }
        .to_string();
        assert!(msg.contains("64"));
        assert!(msg.contains("12"));
    }

    #[test]
    fn short_read_yields_truncation() {
        let mut reader = crate::BitReader::new(&[0xFF, 0xFF]);
        assert_eq!(
            reader.read_u32(),
            Err(BitError::TruncatedStream {
                requested: 32,
                available: 16,
            })
        );
    }

    #[test]
    fn width_errors_display() {
        let wide = BitError::InvalidBitCount {
            bits: 65,
            max_bits: 64,
        };
        assert!(wide.to_string().contains("65"));
        let big = BitError::ValueOutOfRange { value: 9, bits: 3 };
        assert!(big.to_string().contains("3-bit"));
    }
}
