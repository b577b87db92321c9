//! Packet identifiers, the `Packet` trait and the decode registry.

use bitstream::{BitReader, BitWriter};

use crate::error::{DecodeError, EncodeError, LimitKind, WireResult};
use crate::game_message::{ClientGameMessage, ServerGameMessage};
use crate::header::{PacketHeader, RemoteConnection, HEADER_SIZE};
use crate::limits::Limits;
use crate::world::{ClientLoadComplete, DetailedUserInfo, JoinWorldRequest, WorldInfo};

/// Every packet kind this layer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PacketId {
    /// Client asks to enter the world with a character.
    JoinWorldRequest,
    /// Client finished loading the zone.
    ClientLoadComplete,
    /// Client-to-server game message envelope.
    ClientGameMessage,
    /// Server tells the client which zone to load.
    WorldInfo,
    /// Server sends the character's property list.
    DetailedUserInfo,
    /// Server-to-client game message envelope.
    ServerGameMessage,
}

impl PacketId {
    /// All known packet kinds.
    pub const ALL: [Self; 6] = [
        Self::JoinWorldRequest,
        Self::ClientLoadComplete,
        Self::ClientGameMessage,
        Self::WorldInfo,
        Self::DetailedUserInfo,
        Self::ServerGameMessage,
    ];

    /// Returns the wire header for this packet kind.
    #[must_use]
    pub const fn header(self) -> PacketHeader {
        match self {
            Self::JoinWorldRequest => PacketHeader::new(RemoteConnection::World, 0x04),
            Self::ClientGameMessage => PacketHeader::new(RemoteConnection::World, 0x05),
            Self::ClientLoadComplete => PacketHeader::new(RemoteConnection::World, 0x13),
            Self::WorldInfo => PacketHeader::new(RemoteConnection::Client, 0x02),
            Self::DetailedUserInfo => PacketHeader::new(RemoteConnection::Client, 0x04),
            Self::ServerGameMessage => PacketHeader::new(RemoteConnection::Client, 0x0C),
        }
    }

    /// Looks up the packet kind named by a header.
    #[must_use]
    pub fn from_header(header: PacketHeader) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.header() == header)
    }

    /// Returns `true` for packets the client sends to the server.
    #[must_use]
    pub const fn is_inbound(self) -> bool {
        matches!(
            self,
            Self::JoinWorldRequest | Self::ClientLoadComplete | Self::ClientGameMessage
        )
    }
}

/// A packet with an explicit, fixed body layout.
///
/// Implementors list every field with its wire width; the shared header is
/// handled by [`encode_packet`] and [`decode_packet`].
pub trait Packet: Sized {
    /// The packet kind.
    const ID: PacketId;

    /// Writes the body (everything after the header).
    fn serialize_body(&self, writer: &mut BitWriter) -> Result<(), EncodeError>;

    /// Reads the body (everything after the header).
    fn deserialize_body(reader: &mut BitReader<'_>, limits: &Limits) -> WireResult<Self>;
}

/// Encodes a complete packet, header included.
///
/// The packet is fully built in memory before any byte is handed out.
pub fn encode_packet<P: Packet>(packet: &P) -> Result<Vec<u8>, EncodeError> {
    let mut writer = BitWriter::with_capacity(HEADER_SIZE + 32);
    P::ID.header().encode(&mut writer);
    packet.serialize_body(&mut writer)?;
    Ok(writer.finish())
}

/// A decoded packet of any known kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    JoinWorldRequest(JoinWorldRequest),
    ClientLoadComplete(ClientLoadComplete),
    ClientGameMessage(ClientGameMessage),
    WorldInfo(WorldInfo),
    DetailedUserInfo(DetailedUserInfo),
    ServerGameMessage(ServerGameMessage),
}

impl Inbound {
    /// Returns the packet kind.
    #[must_use]
    pub const fn id(&self) -> PacketId {
        match self {
            Self::JoinWorldRequest(_) => PacketId::JoinWorldRequest,
            Self::ClientLoadComplete(_) => PacketId::ClientLoadComplete,
            Self::ClientGameMessage(_) => PacketId::ClientGameMessage,
            Self::WorldInfo(_) => PacketId::WorldInfo,
            Self::DetailedUserInfo(_) => PacketId::DetailedUserInfo,
            Self::ServerGameMessage(_) => PacketId::ServerGameMessage,
        }
    }

    /// Re-encodes the packet, header included.
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        match self {
            Self::JoinWorldRequest(p) => encode_packet(p),
            Self::ClientLoadComplete(p) => encode_packet(p),
            Self::ClientGameMessage(p) => encode_packet(p),
            Self::WorldInfo(p) => encode_packet(p),
            Self::DetailedUserInfo(p) => encode_packet(p),
            Self::ServerGameMessage(p) => encode_packet(p),
        }
    }
}

/// Decodes a packet, selecting the deserializer from the header.
///
/// Unknown kinds yield [`DecodeError::UnknownPacket`]; callers log and drop.
pub fn decode_packet(buf: &[u8], limits: &Limits) -> WireResult<Inbound> {
    let mut reader = open(buf, limits)?;
    let header = PacketHeader::decode(&mut reader)?;
    let Some(id) = PacketId::from_header(header) else {
        return Err(DecodeError::UnknownPacket {
            remote: header.remote,
            code: header.code,
        });
    };

    let packet = match id {
        PacketId::JoinWorldRequest => Inbound::JoinWorldRequest(body(&mut reader, limits)?),
        PacketId::ClientLoadComplete => Inbound::ClientLoadComplete(body(&mut reader, limits)?),
        PacketId::ClientGameMessage => Inbound::ClientGameMessage(body(&mut reader, limits)?),
        PacketId::WorldInfo => Inbound::WorldInfo(body(&mut reader, limits)?),
        PacketId::DetailedUserInfo => Inbound::DetailedUserInfo(body(&mut reader, limits)?),
        PacketId::ServerGameMessage => Inbound::ServerGameMessage(body(&mut reader, limits)?),
    };
    Ok(packet)
}

/// Decodes a packet that must be of kind `P`.
pub fn decode_as<P: Packet>(buf: &[u8], limits: &Limits) -> WireResult<P> {
    let mut reader = open(buf, limits)?;
    let header = PacketHeader::decode(&mut reader)?;
    if header != P::ID.header() {
        return Err(DecodeError::UnknownPacket {
            remote: header.remote,
            code: header.code,
        });
    }
    body(&mut reader, limits)
}

fn open<'a>(buf: &'a [u8], limits: &Limits) -> WireResult<BitReader<'a>> {
    if buf.len() > limits.max_packet_bytes {
        return Err(DecodeError::LimitsExceeded {
            kind: LimitKind::PacketBytes,
            limit: limits.max_packet_bytes,
            actual: buf.len(),
        });
    }
    Ok(BitReader::new(buf))
}

fn body<P: Packet>(reader: &mut BitReader<'_>, limits: &Limits) -> WireResult<P> {
    let packet = P::deserialize_body(reader, limits)?;
    // Padding inside the final byte is expected; whole bytes are not.
    let remaining = reader.bytes_remaining();
    if remaining > 0 {
        return Err(DecodeError::TrailingData {
            packet: P::ID,
            remaining,
        });
    }
    Ok(packet)
}
