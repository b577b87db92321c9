//! Packet framing and packet records for the lunet game protocol.
//!
//! This crate handles the outer packet layer: the 8-byte header, one typed
//! record per packet kind, the decode registry and the outbound transport
//! seam. It does not interpret game-message payloads; that is the server's
//! job.
//!
//! # Design Principles
//!
//! - **Explicit layouts** - Every packet lists its fields with their wire widths.
//! - **Bounded decoding** - Packet and payload sizes are checked against [`Limits`].
//! - **Whole packets** - A packet is fully encoded before any byte is sent.

mod error;
mod game_message;
mod header;
mod limits;
mod packet;
mod transport;
mod world;

pub use error::{DecodeError, EncodeError, LimitKind, WireResult};
pub use game_message::{ClientGameMessage, GameMessageId, ServerGameMessage};
pub use header::{PacketHeader, RemoteConnection, HEADER_SIZE, USER_PACKET_MARKER};
pub use limits::Limits;
pub use packet::{decode_as, decode_packet, encode_packet, Inbound, Packet, PacketId};
pub use transport::{send_packet, Transport};
pub use world::{
    CharacterDetails, ClientLoadComplete, DetailedUserInfo, JoinWorldRequest, WorldInfo,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let _ = USER_PACKET_MARKER;
        let _ = HEADER_SIZE;
        let _ = PacketId::ALL;
        let _ = GameMessageId::ALL;
        let _ = Limits::default();
        let _ = PacketHeader::new(RemoteConnection::World, 0x04);

        let _: WireResult<()> = Ok(());
    }

    #[test]
    fn limits_default_is_reasonable() {
        let limits = Limits::default();
        assert!(limits.max_packet_bytes >= 1024);
        assert!(limits.max_payload_bytes <= limits.max_packet_bytes);
    }

    #[test]
    fn header_size_constant_correct() {
        assert_eq!(
            HEADER_SIZE,
            std::mem::size_of::<u8>() // marker
                + std::mem::size_of::<u16>() // remote connection
                + std::mem::size_of::<u32>() // packet code
                + std::mem::size_of::<u8>() // padding
        );
    }
}
