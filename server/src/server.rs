//! The server: decodes inbound packets and routes them to handlers.

use std::net::SocketAddr;

use bitstream::BitWriter;
use replica::{Player, ReplicaManager};
use tracing::{debug, instrument, warn};
use wire::{
    decode_packet, send_packet, DecodeError, GameMessageId, Inbound, Packet, PacketId,
    ServerGameMessage, Transport,
};

use crate::backend::Backend;
use crate::config::ServerConfig;
use crate::dispatch::GameMessageDispatcher;
use crate::error::{ServerError, ServerResult};
use crate::router::PacketRouter;
use crate::{join_world, missions};

/// Application-protocol server over one backend and one transport.
///
/// Inbound events are handled one at a time, to completion.
pub struct Server<B, T> {
    pub(crate) backend: B,
    pub(crate) transport: T,
    pub(crate) replicas: ReplicaManager<Player>,
    pub(crate) config: ServerConfig,
    pub(crate) router: PacketRouter<B, T>,
    pub(crate) dispatcher: GameMessageDispatcher<B, T>,
}

impl<B: Backend, T: Transport> Server<B, T> {
    /// Creates a server with the standard packet and game-message handlers.
    pub fn new(backend: B, transport: T, config: ServerConfig) -> Self {
        let mut router = PacketRouter::new();
        router.register(PacketId::JoinWorldRequest, join_world::join_world_request);
        router.register(PacketId::ClientLoadComplete, join_world::client_load_complete);
        router.register(PacketId::ClientGameMessage, route_game_message);

        let mut dispatcher = GameMessageDispatcher::new();
        dispatcher.register(GameMessageId::RequestUse, missions::request_use);
        dispatcher.register(
            GameMessageId::RequestLinkedMission,
            missions::request_linked_mission,
        );
        dispatcher.register(GameMessageId::MissionDialogueOk, missions::mission_dialogue_ok);
        dispatcher.register(GameMessageId::ReadyForUpdates, missions::ready_for_updates);

        Self {
            backend,
            transport,
            replicas: ReplicaManager::new(),
            config,
            router,
            dispatcher,
        }
    }

    /// Handles one inbound packet, logging any error.
    ///
    /// Errors end the current packet only; the connection stays open.
    pub fn receive(&mut self, bytes: &[u8], addr: SocketAddr) {
        match self.handle_packet(bytes, addr) {
            Ok(()) => {}
            Err(ServerError::Decode(DecodeError::UnknownPacket { remote, code })) => {
                debug!(%addr, remote, code, "dropping unknown packet");
            }
            Err(err) => warn!(%addr, error = %err, "packet handling failed"),
        }
    }

    /// Decodes and routes one inbound packet.
    #[instrument(skip(self, bytes), fields(len = bytes.len()), level = "debug")]
    pub fn handle_packet(&mut self, bytes: &[u8], addr: SocketAddr) -> ServerResult<()> {
        let packet = decode_packet(bytes, &self.config.limits)?;
        self.route(packet, addr)
    }

    /// Routes an already decoded packet.
    pub fn route(&mut self, packet: Inbound, addr: SocketAddr) -> ServerResult<()> {
        let id = packet.id();
        let handler = self
            .router
            .get(id)
            .ok_or(ServerError::Unrouted { packet: id })?;
        debug!(%addr, packet = ?id, "routing packet");
        handler(self, packet, addr)
    }

    /// Encodes and sends a packet to `addr`.
    pub fn send<P: Packet>(&mut self, addr: SocketAddr, packet: &P) -> ServerResult<()> {
        send_packet(&mut self.transport, addr, packet)?;
        Ok(())
    }

    /// Sends a server game message whose payload is `payload`'s bytes.
    pub fn send_game_message(
        &mut self,
        addr: SocketAddr,
        object_id: i64,
        id: GameMessageId,
        payload: BitWriter,
    ) -> ServerResult<()> {
        let message = ServerGameMessage::new(object_id, id, payload.finish());
        debug!(%addr, object_id, message = ?id, "sending game message");
        self.send(addr, &message)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn replicas(&self) -> &ReplicaManager<Player> {
        &self.replicas
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn router_mut(&mut self) -> &mut PacketRouter<B, T> {
        &mut self.router
    }

    pub fn dispatcher(&self) -> &GameMessageDispatcher<B, T> {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut GameMessageDispatcher<B, T> {
        &mut self.dispatcher
    }

    /// Drops a disconnected peer from replica observation.
    pub fn disconnect(&mut self, addr: SocketAddr) {
        self.replicas.remove_participant(addr);
    }
}

fn route_game_message<B: Backend, T: Transport>(
    server: &mut Server<B, T>,
    packet: Inbound,
    addr: SocketAddr,
) -> ServerResult<()> {
    match packet {
        Inbound::ClientGameMessage(message) => server.handle_game_message(&message, addr),
        other => Err(ServerError::UnexpectedPacket {
            expected: PacketId::ClientGameMessage,
            found: other.id(),
        }),
    }
}
