//! Packet header types and constants.

use bitstream::{BitReader, BitWriter};

use crate::error::{DecodeError, WireResult};

/// Leading byte of every application packet (the transport's user-packet id).
pub const USER_PACKET_MARKER: u8 = 0x53;

/// Header size in bytes (8 total).
pub const HEADER_SIZE: usize = 1 + 2 + 4 + 1;

/// Remote connection type carried in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum RemoteConnection {
    General = 0,
    Auth = 1,
    Chat = 2,
    /// Client to world server.
    World = 4,
    /// World server to client.
    Client = 5,
}

/// Fixed packet prefix shared by every packet kind.
///
/// Layout: `u8 0x53`, `u16 remote connection`, `u32 packet code`, `u8 padding`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PacketHeader {
    /// Raw remote connection type.
    pub remote: u16,
    /// Packet code within that connection type.
    pub code: u32,
}

impl PacketHeader {
    /// Creates a header for a known connection type.
    #[must_use]
    pub const fn new(remote: RemoteConnection, code: u32) -> Self {
        Self {
            remote: remote as u16,
            code,
        }
    }

    /// Writes the header.
    pub fn encode(&self, writer: &mut BitWriter) {
        writer.write_u8(USER_PACKET_MARKER);
        writer.write_u16(self.remote);
        writer.write_u32(self.code);
        writer.write_u8(0);
    }

    /// Reads and validates the header.
    pub fn decode(reader: &mut BitReader<'_>) -> WireResult<Self> {
        let available = reader.bytes_remaining();
        if available < HEADER_SIZE {
            return Err(DecodeError::PacketTooSmall {
                actual: available,
                required: HEADER_SIZE,
            });
        }
        let marker = reader.read_u8()?;
        if marker != USER_PACKET_MARKER {
            return Err(DecodeError::InvalidMarker { found: marker });
        }
        let remote = reader.read_u16()?;
        let code = reader.read_u32()?;
        // Padding byte; the client always sends zero but does not check it.
        reader.read_u8()?;
        Ok(Self { remote, code })
    }
}
