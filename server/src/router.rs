//! Packet handler registry.

use std::collections::BTreeMap;
use std::net::SocketAddr;

use wire::{Inbound, PacketId};

use crate::error::ServerResult;
use crate::server::Server;

/// Handles one decoded packet from `addr`.
pub type PacketHandler<B, T> = fn(&mut Server<B, T>, Inbound, SocketAddr) -> ServerResult<()>;

/// Maps packet kinds to their handlers.
pub struct PacketRouter<B, T> {
    handlers: BTreeMap<PacketId, PacketHandler<B, T>>,
}

impl<B, T> Default for PacketRouter<B, T> {
    fn default() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }
}

impl<B, T> PacketRouter<B, T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `id`, returning the handler it replaces.
    pub fn register(
        &mut self,
        id: PacketId,
        handler: PacketHandler<B, T>,
    ) -> Option<PacketHandler<B, T>> {
        self.handlers.insert(id, handler)
    }

    /// Returns the handler for `id`.
    #[must_use]
    pub fn get(&self, id: PacketId) -> Option<PacketHandler<B, T>> {
        self.handlers.get(&id).copied()
    }

    /// Packet kinds with a handler, in id order.
    pub fn routes(&self) -> impl Iterator<Item = PacketId> + '_ {
        self.handlers.keys().copied()
    }
}
