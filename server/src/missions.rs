//! Game-message handlers for object interaction and missions.

use std::net::SocketAddr;

use bitstream::{BitReader, BitWriter};
use tracing::{debug, info};
use wire::{ClientGameMessage, GameMessageId, Transport};

use crate::backend::{Backend, Session};
use crate::error::{ServerError, ServerResult};
use crate::join_world::front_character;
use crate::server::Server;

/// Task-state flag reported with every mission notification.
pub const MISSION_TASK_FLAG: i32 = 1 << 5;

/// Player interacted with an object; offer its first mission, if any.
pub fn request_use<B: Backend, T: Transport>(
    server: &mut Server<B, T>,
    message: &ClientGameMessage,
    addr: SocketAddr,
    session: &Session,
    reader: &mut BitReader<'_>,
) -> ServerResult<()> {
    let multi_interact = reader.read_bool()?;
    let multi_interact_id = reader.read_u32()?;
    let multi_interact_type = reader.read_i32()?;
    let object_id = reader.read_i64()?;
    let secondary = reader.read_bool()?;
    debug!(
        %addr,
        multi_interact,
        multi_interact_id,
        multi_interact_type,
        object_id,
        secondary,
        "request use"
    );

    let clone = server
        .backend
        .get_world_clone(session.clone_id)
        .ok_or(ServerError::CloneNotFound {
            clone_id: session.clone_id,
        })?;
    let lot = clone
        .find_object(object_id)
        .map(|object| object.lot)
        .ok_or(ServerError::ObjectNotFound { object_id })?;

    let missions = server.backend.missions_for_object_type(lot);
    let Some(&mission_id) = missions.first() else {
        return Ok(());
    };

    let mut payload = BitWriter::new();
    payload.write_i32(mission_id);
    payload.write_i64(object_id);
    server.send_game_message(addr, message.object_id, GameMessageId::OfferMission, payload)
}

/// Client asked for a mission linked to an object. Logged only.
pub fn request_linked_mission<B: Backend, T: Transport>(
    _server: &mut Server<B, T>,
    _message: &ClientGameMessage,
    addr: SocketAddr,
    _session: &Session,
    reader: &mut BitReader<'_>,
) -> ServerResult<()> {
    let object_id = reader.read_i64()?;
    let mission_id = reader.read_i32()?;
    let offered = reader.read_bool()?;
    debug!(%addr, object_id, mission_id, offered, "linked mission requested");
    Ok(())
}

/// Player accepted or turned in a mission from the dialogue.
///
/// Completes the mission for the account's front character, then sends
/// exactly one task notification. Nothing is sent if the store refuses.
pub fn mission_dialogue_ok<B: Backend, T: Transport>(
    server: &mut Server<B, T>,
    message: &ClientGameMessage,
    addr: SocketAddr,
    session: &Session,
    reader: &mut BitReader<'_>,
) -> ServerResult<()> {
    let complete = reader.read_bool()?;
    let state = reader.read_i32()?;
    let mission_id = reader.read_i32()?;
    let responder = reader.read_i64()?;
    info!(%addr, mission_id, complete, state, responder, "mission accepted");

    let character = front_character(&server.backend, session.account_id)?;
    if !server.backend.complete_mission(character.id, mission_id) {
        return Err(ServerError::MissionNotCompleted {
            character_id: character.id,
            mission_id,
        });
    }

    let mut payload = BitWriter::new();
    payload.write_i32(mission_id);
    payload.write_i32(MISSION_TASK_FLAG);
    payload.write_u8(0);
    server.send_game_message(
        addr,
        message.object_id,
        GameMessageId::NotifyMissionTask,
        payload,
    )
}

/// Client is ready for replica updates. Nothing to do.
pub fn ready_for_updates<B: Backend, T: Transport>(
    _server: &mut Server<B, T>,
    _message: &ClientGameMessage,
    _addr: SocketAddr,
    _session: &Session,
    _reader: &mut BitReader<'_>,
) -> ServerResult<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{CharacterRecord, MemoryBackend, WorldClone, WorldObject};
    use crate::config::ServerConfig;
    use wire::{decode_as, encode_packet, Limits, ServerGameMessage};

    type Sent = Vec<(SocketAddr, Vec<u8>)>;

    const PLAYER: i64 = 1_152_921_510_794_154_770;
    const NPC: i64 = 70_000;
    const NPC_LOT: i32 = 3_000;

    fn addr() -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], 4000))
    }

    fn server() -> Server<MemoryBackend, Sent> {
        let mut backend = MemoryBackend::new();
        backend.add_session(
            addr(),
            Session {
                account_id: 1,
                clone_id: 9,
            },
        );
        backend.add_character(CharacterRecord {
            id: PLAYER,
            account_id: 1,
            name: "Ace".to_owned(),
            last_zone: 1000,
        });
        backend.set_front_character(1, 0);
        backend.add_clone(WorldClone {
            clone_id: 9,
            zone_id: 1000,
            objects: vec![WorldObject {
                object_id: NPC,
                lot: NPC_LOT,
            }],
        });
        Server::new(backend, Vec::new(), ServerConfig::for_testing())
    }

    fn request_use_bytes(object_id: i64) -> Vec<u8> {
        let mut payload = BitWriter::new();
        payload.write_bool(false);
        payload.write_u32(0);
        payload.write_i32(0);
        payload.write_i64(object_id);
        payload.write_bool(false);
        let message = ClientGameMessage::new(PLAYER, GameMessageId::RequestUse, payload.finish());
        encode_packet(&message).unwrap()
    }

    #[test]
    fn request_use_offers_first_mission() {
        let mut server = server();
        server.backend_mut().add_missions(NPC_LOT, vec![173, 174]);
        server.handle_packet(&request_use_bytes(NPC), addr()).unwrap();

        assert_eq!(server.transport().len(), 1);
        let offer: ServerGameMessage =
            decode_as(&server.transport()[0].1, &Limits::default()).unwrap();
        assert_eq!(offer.object_id, PLAYER);
        assert_eq!(offer.known_id(), Some(GameMessageId::OfferMission));
        let mut reader = offer.payload_reader();
        assert_eq!(reader.read_i32().unwrap(), 173);
        assert_eq!(reader.read_i64().unwrap(), NPC);
    }

    #[test]
    fn request_use_without_missions_is_silent() {
        let mut server = server();
        server.handle_packet(&request_use_bytes(NPC), addr()).unwrap();
        assert!(server.transport().is_empty());
    }

    #[test]
    fn request_use_unknown_object() {
        let mut server = server();
        assert_eq!(
            server.handle_packet(&request_use_bytes(1), addr()),
            Err(ServerError::ObjectNotFound { object_id: 1 })
        );
        assert!(server.transport().is_empty());
    }

    #[test]
    fn truncated_payload_ends_message() {
        let mut server = server();
        let message = ClientGameMessage::new(PLAYER, GameMessageId::RequestUse, vec![0, 0]);
        let bytes = encode_packet(&message).unwrap();
        assert!(matches!(
            server.handle_packet(&bytes, addr()),
            Err(ServerError::Bitstream(_))
        ));
    }

    #[test]
    fn refused_mission_sends_nothing() {
        let mut server = server();
        server.backend_mut().refuse_mission(700);
        let mut payload = BitWriter::new();
        payload.write_bool(true);
        payload.write_i32(5);
        payload.write_i32(700);
        payload.write_i64(12345);
        let message =
            ClientGameMessage::new(PLAYER, GameMessageId::MissionDialogueOk, payload.finish());
        let bytes = encode_packet(&message).unwrap();
        assert!(server.handle_packet(&bytes, addr()).is_err());
        assert!(server.transport().is_empty());
    }

    #[test]
    fn ready_for_updates_is_silent() {
        let mut server = server();
        let message = ClientGameMessage::new(PLAYER, GameMessageId::ReadyForUpdates, vec![]);
        let bytes = encode_packet(&message).unwrap();
        server.handle_packet(&bytes, addr()).unwrap();
        assert!(server.transport().is_empty());
    }
}
