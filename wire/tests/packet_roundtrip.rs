//! Deserialize-then-serialize must reproduce the input bytes for every packet kind.

use proptest::prelude::*;
use wire::{
    decode_packet, encode_packet, CharacterDetails, DecodeError, DetailedUserInfo, Limits,
    PacketId, HEADER_SIZE,
};

/// Builds a raw packet from a header and an arbitrary body.
fn raw_packet(id: PacketId, body: &[u8]) -> Vec<u8> {
    let mut writer = bitstream::BitWriter::new();
    id.header().encode(&mut writer);
    writer.write_bytes(body);
    writer.finish()
}

fn fixed_body_len(id: PacketId) -> Option<usize> {
    match id {
        PacketId::JoinWorldRequest => Some(8),
        PacketId::ClientLoadComplete => Some(8),
        PacketId::WorldInfo => Some(30),
        PacketId::ClientGameMessage
        | PacketId::ServerGameMessage
        | PacketId::DetailedUserInfo => None,
    }
}

fn assert_identity(bytes: &[u8]) {
    let packet = decode_packet(bytes, &Limits::default()).unwrap();
    assert_eq!(packet.encode().unwrap(), bytes, "{:?}", packet.id());
}

proptest! {
    #[test]
    fn prop_fixed_layout_identity(body in prop::collection::vec(any::<u8>(), 30)) {
        for id in PacketId::ALL {
            let Some(len) = fixed_body_len(id) else { continue };
            let bytes = raw_packet(id, &body[..len]);
            let packet = decode_packet(&bytes, &Limits::default()).unwrap();
            prop_assert_eq!(packet.id(), id);
            prop_assert_eq!(packet.encode().unwrap(), bytes);
        }
    }

    #[test]
    fn prop_game_message_identity(
        object_id in any::<i64>(),
        message_id in any::<u16>(),
        payload in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        for id in [PacketId::ClientGameMessage, PacketId::ServerGameMessage] {
            let mut body = Vec::new();
            body.extend_from_slice(&object_id.to_le_bytes());
            body.extend_from_slice(&message_id.to_le_bytes());
            body.extend_from_slice(&payload);
            let bytes = raw_packet(id, &body);
            let packet = decode_packet(&bytes, &Limits::default()).unwrap();
            prop_assert_eq!(packet.encode().unwrap(), bytes);
        }
    }

    #[test]
    fn prop_truncation_never_panics(body in prop::collection::vec(any::<u8>(), 0..40)) {
        for id in PacketId::ALL {
            let bytes = raw_packet(id, &body);
            for cut in 0..bytes.len() {
                let _ = decode_packet(&bytes[..cut], &Limits::default());
            }
        }
    }
}

#[test]
fn detailed_user_info_identity() {
    let info = DetailedUserInfo::for_character(&CharacterDetails {
        account_id: 12,
        object_id: 1_152_921_510_794_154_770,
        name: "Wisp Lee".to_owned(),
        zone_id: 1100,
        inventory_space: 20,
        currency: 350,
        level: 4,
        reputation: 100,
    })
    .unwrap();
    let bytes = encode_packet(&info).unwrap();
    assert!(bytes.len() > HEADER_SIZE);
    assert_identity(&bytes);
}

/// A user-info packet holding one bool entry `k` with the given raw byte.
fn user_info_with_bool_byte(byte: u8) -> Vec<u8> {
    let body = [1, 0, 0, 0, 2, b'k', 0, 7, byte];
    let mut framed = Vec::new();
    framed.extend_from_slice(&(body.len() as u32 + 5).to_le_bytes());
    framed.push(0);
    framed.extend_from_slice(&body);
    raw_packet(PacketId::DetailedUserInfo, &framed)
}

#[test]
fn user_info_bool_bytes_keep_identity() {
    assert_identity(&user_info_with_bool_byte(0));
    assert_identity(&user_info_with_bool_byte(1));
}

#[test]
fn user_info_rejects_non_canonical_bool() {
    let bytes = user_info_with_bool_byte(2);
    assert_eq!(
        decode_packet(&bytes, &Limits::default()),
        Err(DecodeError::Ldf(ldf::LdfError::InvalidBool { byte: 2 }))
    );
}

#[test]
fn every_packet_kind_is_covered() {
    let covered = PacketId::ALL
        .into_iter()
        .filter(|id| fixed_body_len(*id).is_some())
        .count();
    // Game messages and user info have their own cases above.
    assert_eq!(covered + 3, PacketId::ALL.len());
}
