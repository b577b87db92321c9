//! World entry: join request and load completion.

use std::net::SocketAddr;

use bitstream::BitWriter;
use replica::Player;
use tracing::{debug, info, warn};
use wire::{
    CharacterDetails, DetailedUserInfo, GameMessageId, Inbound, PacketId, Transport, WorldInfo,
};

use crate::backend::{Backend, CharacterRecord};
use crate::error::{ServerError, ServerResult};
use crate::server::Server;

/// Answers a join request with the world the character last played in.
pub fn join_world_request<B: Backend, T: Transport>(
    server: &mut Server<B, T>,
    packet: Inbound,
    addr: SocketAddr,
) -> ServerResult<()> {
    let request = match packet {
        Inbound::JoinWorldRequest(request) => request,
        other => return Err(unexpected(PacketId::JoinWorldRequest, &other)),
    };
    let character = server
        .backend
        .get_character(request.character_id)
        .ok_or(ServerError::CharacterNotFound {
            character_id: request.character_id,
        })?;

    let zone_id = character.last_zone;
    let checksum = server.config.zone_checksum(zone_id).unwrap_or_else(|| {
        warn!(zone_id, "no checksum configured for zone");
        0
    });
    info!(%addr, character_id = character.id, zone_id, "character joining world");

    let info = WorldInfo::for_zone(zone_id, checksum, server.config.spawn_position);
    server.send(addr, &info)
}

/// Finishes world entry once the client has loaded the zone.
///
/// Sends the character's property list, registers the client as a replica
/// observer, constructs the player replica, then tells the client that
/// loading is done and the player is ready.
pub fn client_load_complete<B: Backend, T: Transport>(
    server: &mut Server<B, T>,
    packet: Inbound,
    addr: SocketAddr,
) -> ServerResult<()> {
    let loaded = match packet {
        Inbound::ClientLoadComplete(loaded) => loaded,
        other => return Err(unexpected(PacketId::ClientLoadComplete, &other)),
    };
    let session = server
        .backend
        .get_session(addr)
        .ok_or(ServerError::SessionNotFound { addr })?;
    let character = front_character(&server.backend, session.account_id)?;

    let defaults = server.config.player;
    let details = CharacterDetails {
        account_id: session.account_id,
        object_id: character.id,
        name: character.name.clone(),
        zone_id: loaded.zone_id,
        inventory_space: defaults.inventory_space,
        currency: defaults.currency,
        level: defaults.level,
        reputation: defaults.reputation,
    };
    server.send(addr, &DetailedUserInfo::for_character(&details)?)?;

    server.replicas.add_participant(addr, &mut server.transport)?;
    if server.replicas.network_id_of(character.id).is_some() {
        debug!(character_id = character.id, "player replica already live");
    } else {
        let mut player = Player::new(character.id, character.name.clone());
        player.character.account_id = session.account_id;
        player.character.level = defaults.level;
        player.physics.position = server.config.spawn_position;
        let network_id = server.replicas.construct(player, &mut server.transport)?;
        debug!(character_id = character.id, network_id, "player replica constructed");
    }

    server.send_game_message(
        addr,
        character.id,
        GameMessageId::DoneLoadingObjects,
        BitWriter::new(),
    )?;
    server.send_game_message(addr, character.id, GameMessageId::PlayerReady, BitWriter::new())
}

/// Resolves the character an account is playing.
pub(crate) fn front_character<B: Backend>(
    backend: &B,
    account_id: i64,
) -> ServerResult<CharacterRecord> {
    let index = backend
        .front_character_index(account_id)
        .ok_or(ServerError::NoFrontCharacter { account_id })?;
    backend
        .characters_for_account(account_id)
        .into_iter()
        .nth(index)
        .ok_or(ServerError::NoFrontCharacter { account_id })
}

fn unexpected(expected: PacketId, packet: &Inbound) -> ServerError {
    ServerError::UnexpectedPacket {
        expected,
        found: packet.id(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MemoryBackend, Session};
    use crate::config::ServerConfig;
    use wire::{decode_as, encode_packet, JoinWorldRequest, Limits, ServerGameMessage};

    type Sent = Vec<(SocketAddr, Vec<u8>)>;

    fn addr() -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], 3000))
    }

    fn server(last_zone: u16) -> Server<MemoryBackend, Sent> {
        let mut backend = MemoryBackend::new();
        backend.add_character(CharacterRecord {
            id: 77,
            account_id: 1,
            name: "Ace".to_owned(),
            last_zone,
        });
        backend.add_session(
            addr(),
            Session {
                account_id: 1,
                clone_id: 0,
            },
        );
        backend.set_front_character(1, 0);
        Server::new(backend, Vec::new(), ServerConfig::for_testing())
    }

    #[test]
    fn unknown_zone_gets_zero_checksum() {
        let mut server = server(4242);
        let bytes = encode_packet(&JoinWorldRequest { character_id: 77 }).unwrap();
        server.handle_packet(&bytes, addr()).unwrap();
        let info: WorldInfo = decode_as(&server.transport()[0].1, &Limits::default()).unwrap();
        assert_eq!(info.zone_id, 4242);
        assert_eq!(info.map_checksum, 0);
    }

    #[test]
    fn unknown_character_sends_nothing() {
        let mut server = server(1000);
        let bytes = encode_packet(&JoinWorldRequest { character_id: 5 }).unwrap();
        assert_eq!(
            server.handle_packet(&bytes, addr()),
            Err(ServerError::CharacterNotFound { character_id: 5 })
        );
        assert!(server.transport().is_empty());
    }

    #[test]
    fn reload_does_not_duplicate_player() {
        let mut server = server(1000);
        let loaded = Inbound::ClientLoadComplete(wire::ClientLoadComplete {
            zone_id: 1000,
            map_instance: 0,
            map_clone: 0,
        });
        server.route(loaded.clone(), addr()).unwrap();
        server.route(loaded, addr()).unwrap();
        assert_eq!(server.replicas().len(), 1);

        let last = &server.transport().last().unwrap().1;
        let ready: ServerGameMessage = decode_as(last, &Limits::default()).unwrap();
        assert_eq!(ready.known_id(), Some(GameMessageId::PlayerReady));
    }

    #[test]
    fn very_long_name_still_completes_loading() {
        let mut server = server(1000);
        server.backend_mut().add_character(CharacterRecord {
            id: 78,
            account_id: 2,
            name: "x".repeat(300),
            last_zone: 1000,
        });
        server.backend_mut().add_session(
            addr(),
            Session {
                account_id: 2,
                clone_id: 0,
            },
        );
        server.backend_mut().set_front_character(2, 0);
        let loaded = Inbound::ClientLoadComplete(wire::ClientLoadComplete {
            zone_id: 1000,
            map_instance: 0,
            map_clone: 0,
        });
        server.route(loaded, addr()).unwrap();
        assert_eq!(server.transport().len(), 4);
        assert!(server.replicas().network_id_of(78).is_some());
    }

    #[test]
    fn front_character_index_out_of_range() {
        let mut backend = MemoryBackend::new();
        backend.set_front_character(1, 3);
        assert_eq!(
            front_character(&backend, 1),
            Err(ServerError::NoFrontCharacter { account_id: 1 })
        );
    }
}
