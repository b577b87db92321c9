//! The game-message envelope and the inner message ids.

use bitstream::{BitReader, BitWriter};

use crate::error::{DecodeError, EncodeError, LimitKind, WireResult};
use crate::limits::Limits;
use crate::packet::{Packet, PacketId};

/// Inner message ids carried by the game-message envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum GameMessageId {
    OfferMission = 248,
    NotifyMissionTask = 255,
    RequestUse = 364,
    PlayerReady = 509,
    RequestLinkedMission = 515,
    MissionDialogueOk = 520,
    ReadyForUpdates = 888,
    DoneLoadingObjects = 1642,
}

impl GameMessageId {
    /// All known message ids.
    pub const ALL: [Self; 8] = [
        Self::OfferMission,
        Self::NotifyMissionTask,
        Self::RequestUse,
        Self::PlayerReady,
        Self::RequestLinkedMission,
        Self::MissionDialogueOk,
        Self::ReadyForUpdates,
        Self::DoneLoadingObjects,
    ];

    /// Maps a raw id to a known message, if any.
    #[must_use]
    pub const fn from_raw(raw: u16) -> Option<Self> {
        match raw {
            248 => Some(Self::OfferMission),
            255 => Some(Self::NotifyMissionTask),
            364 => Some(Self::RequestUse),
            509 => Some(Self::PlayerReady),
            515 => Some(Self::RequestLinkedMission),
            520 => Some(Self::MissionDialogueOk),
            888 => Some(Self::ReadyForUpdates),
            1642 => Some(Self::DoneLoadingObjects),
            _ => None,
        }
    }

    /// Returns the raw wire id.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self as u16
    }

    /// Returns `true` for messages a client sends.
    #[must_use]
    pub const fn is_inbound(self) -> bool {
        matches!(
            self,
            Self::RequestUse
                | Self::RequestLinkedMission
                | Self::MissionDialogueOk
                | Self::ReadyForUpdates
        )
    }
}

macro_rules! envelope {
    ($(#[$meta:meta])* $name:ident, $id:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            /// Object the message is addressed to.
            pub object_id: i64,
            /// Raw inner message id.
            pub message_id: u16,
            /// Inner message body; never inspected at this layer.
            pub payload: Vec<u8>,
        }

        impl $name {
            /// Builds an envelope for a known message id.
            #[must_use]
            pub fn new(object_id: i64, message_id: GameMessageId, payload: Vec<u8>) -> Self {
                Self {
                    object_id,
                    message_id: message_id.raw(),
                    payload,
                }
            }

            /// Returns the known message id, if the raw id is one.
            #[must_use]
            pub const fn known_id(&self) -> Option<GameMessageId> {
                GameMessageId::from_raw(self.message_id)
            }

            /// Returns a reader positioned at the start of the inner payload.
            #[must_use]
            pub fn payload_reader(&self) -> BitReader<'_> {
                BitReader::new(&self.payload)
            }
        }

        impl Packet for $name {
            const ID: PacketId = $id;

            fn serialize_body(&self, writer: &mut BitWriter) -> Result<(), EncodeError> {
                writer.write_i64(self.object_id);
                writer.write_u16(self.message_id);
                writer.write_bytes(&self.payload);
                Ok(())
            }

            fn deserialize_body(reader: &mut BitReader<'_>, limits: &Limits) -> WireResult<Self> {
                let object_id = reader.read_i64()?;
                let message_id = reader.read_u16()?;
                let remaining = reader.bytes_remaining();
                if remaining > limits.max_payload_bytes {
                    return Err(DecodeError::LimitsExceeded {
                        kind: LimitKind::PayloadBytes,
                        limit: limits.max_payload_bytes,
                        actual: remaining,
                    });
                }
                Ok(Self {
                    object_id,
                    message_id,
                    payload: reader.read_remaining()?,
                })
            }
        }
    };
}

envelope!(
    /// Client-to-server game message.
    ClientGameMessage,
    PacketId::ClientGameMessage
);

envelope!(
    /// Server-to-client game message.
    ServerGameMessage,
    PacketId::ServerGameMessage
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::HEADER_SIZE;
    use crate::packet::{decode_packet, encode_packet, Inbound};

    #[test]
    fn raw_ids_roundtrip() {
        for id in GameMessageId::ALL {
            assert_eq!(GameMessageId::from_raw(id.raw()), Some(id));
        }
        assert_eq!(GameMessageId::from_raw(9999), None);
    }

    #[test]
    fn known_raw_values() {
        assert_eq!(GameMessageId::MissionDialogueOk.raw(), 520);
        assert_eq!(GameMessageId::NotifyMissionTask.raw(), 255);
        assert_eq!(GameMessageId::DoneLoadingObjects.raw(), 1642);
    }

    #[test]
    fn envelope_layout() {
        let msg = ServerGameMessage::new(42, GameMessageId::PlayerReady, vec![]);
        let bytes = encode_packet(&msg).unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE + 8 + 2);
        assert_eq!(&bytes[HEADER_SIZE..HEADER_SIZE + 8], &42i64.to_le_bytes());
        assert_eq!(&bytes[HEADER_SIZE + 8..], &509u16.to_le_bytes());
    }

    #[test]
    fn payload_is_the_rest() {
        let msg = ClientGameMessage {
            object_id: 7,
            message_id: 4321,
            payload: vec![1, 2, 3, 4, 5],
        };
        let bytes = encode_packet(&msg).unwrap();
        let Inbound::ClientGameMessage(decoded) =
            decode_packet(&bytes, &Limits::for_testing()).unwrap()
        else {
            panic!("wrong packet kind");
        };
        assert_eq!(decoded, msg);
        assert_eq!(decoded.known_id(), None);
    }

    #[test]
    fn oversized_payload_rejected() {
        let limits = Limits::for_testing();
        let msg = ClientGameMessage {
            object_id: 1,
            message_id: 364,
            payload: vec![0; limits.max_payload_bytes + 1],
        };
        let bytes = encode_packet(&msg).unwrap();
        let err = decode_packet(&bytes, &limits).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::LimitsExceeded {
                kind: LimitKind::PayloadBytes,
                ..
            }
        ));
    }
}
