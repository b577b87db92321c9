//! Outbound seam to the transport layer.

use std::net::SocketAddr;

use crate::error::EncodeError;
use crate::packet::{encode_packet, Packet};

/// Delivers fully encoded packets to a peer.
///
/// Reliability, ordering and encryption belong to the implementor.
pub trait Transport {
    /// Sends one packet to `addr`.
    fn send(&mut self, addr: SocketAddr, bytes: Vec<u8>);
}

/// Records sends in order; used by tests and the tools binary.
impl Transport for Vec<(SocketAddr, Vec<u8>)> {
    fn send(&mut self, addr: SocketAddr, bytes: Vec<u8>) {
        self.push((addr, bytes));
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, addr: SocketAddr, bytes: Vec<u8>) {
        (**self).send(addr, bytes);
    }
}

/// Encodes `packet` and hands it to `transport`.
///
/// Nothing is sent if encoding fails.
pub fn send_packet<T, P>(transport: &mut T, addr: SocketAddr, packet: &P) -> Result<(), EncodeError>
where
    T: Transport + ?Sized,
    P: Packet,
{
    let bytes = encode_packet(packet)?;
    transport.send(addr, bytes);
    Ok(())
}
