//! Error types for replica operations.

use std::fmt;

/// Result type for replica operations.
pub type ReplicaResult<T> = Result<T, ReplicaError>;

/// Errors that can occur while encoding or managing replicas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplicaError {
    /// Bitstream error.
    Bitstream(bitstream::BitError),

    /// A list does not fit its length prefix.
    TooManyEntries { kind: &'static str, count: usize },

    /// No replica is registered under this network id.
    UnknownNetworkId { network_id: u16 },

    /// Every `u16` network id is in use.
    NetworkIdsExhausted,
}

impl fmt::Display for ReplicaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bitstream(e) => write!(f, "bitstream error: {e}"),
            Self::TooManyEntries { kind, count } => {
                write!(f, "too many {kind}: {count}")
            }
            Self::UnknownNetworkId { network_id } => {
                write!(f, "no replica with network id {network_id}")
            }
            Self::NetworkIdsExhausted => write!(f, "all network ids are in use"),
        }
    }
}

impl std::error::Error for ReplicaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bitstream(e) => Some(e),
            _ => None,
        }
    }
}

impl From<bitstream::BitError> for ReplicaError {
    fn from(err: bitstream::BitError) -> Self {
        Self::Bitstream(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unknown_network_id() {
        let err = ReplicaError::UnknownNetworkId { network_id: 9 };
        assert!(err.to_string().contains('9'));
    }

    #[test]
    fn source_only_for_wrapped() {
        assert!(std::error::Error::source(&ReplicaError::NetworkIdsExhausted).is_none());
        let err: ReplicaError = bitstream::BitError::TruncatedStream {
            requested: 8,
            available: 0,
        }
        .into();
        assert!(std::error::Error::source(&err).is_some());
    }
}
