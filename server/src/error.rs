//! Error types for packet and game-message handling.

use std::fmt;
use std::net::SocketAddr;

use wire::PacketId;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that end the handling of one inbound packet or message.
///
/// None of these close the connection; [`crate::Server::receive`] logs them
/// and moves on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerError {
    /// Packet framing or body error.
    Decode(wire::DecodeError),

    /// Outbound packet could not be built.
    Encode(wire::EncodeError),

    /// Inner game-message payload ran short.
    Bitstream(bitstream::BitError),

    /// Replica construction or update failed.
    Replica(replica::ReplicaError),

    /// Packet kind has no registered handler.
    Unrouted { packet: PacketId },

    /// Handler was registered for a different packet kind.
    UnexpectedPacket { expected: PacketId, found: PacketId },

    /// No session is bound to the sender's address.
    SessionNotFound { addr: SocketAddr },

    /// Character id is unknown to the character store.
    CharacterNotFound { character_id: i64 },

    /// Account has no front character to act as.
    NoFrontCharacter { account_id: i64 },

    /// World clone is unknown.
    CloneNotFound { clone_id: u32 },

    /// No object with this id exists in the clone.
    ObjectNotFound { object_id: i64 },

    /// Character store refused to record a mission.
    MissionNotCompleted { character_id: i64, mission_id: i32 },
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(e) => write!(f, "decode error: {e}"),
            Self::Encode(e) => write!(f, "encode error: {e}"),
            Self::Bitstream(e) => write!(f, "game message error: {e}"),
            Self::Replica(e) => write!(f, "replica error: {e}"),
            Self::Unrouted { packet } => write!(f, "no handler for {packet:?}"),
            Self::UnexpectedPacket { expected, found } => {
                write!(f, "expected {expected:?}, got {found:?}")
            }
            Self::SessionNotFound { addr } => write!(f, "no session for {addr}"),
            Self::CharacterNotFound { character_id } => {
                write!(f, "character {character_id} not found")
            }
            Self::NoFrontCharacter { account_id } => {
                write!(f, "account {account_id} has no front character")
            }
            Self::CloneNotFound { clone_id } => write!(f, "world clone {clone_id} not found"),
            Self::ObjectNotFound { object_id } => write!(f, "object {object_id} not found"),
            Self::MissionNotCompleted {
                character_id,
                mission_id,
            } => {
                write!(
                    f,
                    "mission {mission_id} could not be completed for character {character_id}"
                )
            }
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode(e) => Some(e),
            Self::Encode(e) => Some(e),
            Self::Bitstream(e) => Some(e),
            Self::Replica(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wire::DecodeError> for ServerError {
    fn from(err: wire::DecodeError) -> Self {
        Self::Decode(err)
    }
}

impl From<wire::EncodeError> for ServerError {
    fn from(err: wire::EncodeError) -> Self {
        Self::Encode(err)
    }
}

impl From<bitstream::BitError> for ServerError {
    fn from(err: bitstream::BitError) -> Self {
        Self::Bitstream(err)
    }
}

impl From<replica::ReplicaError> for ServerError {
    fn from(err: replica::ReplicaError) -> Self {
        Self::Replica(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_missing_object() {
        let err = ServerError::ObjectNotFound { object_id: 12345 };
        assert!(err.to_string().contains("12345"));
    }

    #[test]
    fn wrapped_errors_have_sources() {
        let err: ServerError = bitstream::BitError::TruncatedStream {
            requested: 32,
            available: 3,
        }
        .into();
        assert!(std::error::Error::source(&err).is_some());

        let err = ServerError::CloneNotFound { clone_id: 1 };
        assert!(std::error::Error::source(&err).is_none());
    }
}
