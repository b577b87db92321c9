//! World-entry packets: join request, load complete, world info and user info.

use bitstream::{BitReader, BitWriter};
use ldf::{FramedLdf, Ldf, LdfType};

use crate::error::{EncodeError, WireResult};
use crate::limits::Limits;
use crate::packet::{Packet, PacketId};

/// Client asks to enter the world as `character_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinWorldRequest {
    /// `i64` character object id.
    pub character_id: i64,
}

impl Packet for JoinWorldRequest {
    const ID: PacketId = PacketId::JoinWorldRequest;

    fn serialize_body(&self, writer: &mut BitWriter) -> Result<(), EncodeError> {
        writer.write_i64(self.character_id);
        Ok(())
    }

    fn deserialize_body(reader: &mut BitReader<'_>, _limits: &Limits) -> WireResult<Self> {
        Ok(Self {
            character_id: reader.read_i64()?,
        })
    }
}

/// Client finished loading a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientLoadComplete {
    /// `u16` zone id.
    pub zone_id: u16,
    /// `u16` map instance.
    pub map_instance: u16,
    /// `u32` map clone.
    pub map_clone: u32,
}

impl Packet for ClientLoadComplete {
    const ID: PacketId = PacketId::ClientLoadComplete;

    fn serialize_body(&self, writer: &mut BitWriter) -> Result<(), EncodeError> {
        writer.write_u16(self.zone_id);
        writer.write_u16(self.map_instance);
        writer.write_u32(self.map_clone);
        Ok(())
    }

    fn deserialize_body(reader: &mut BitReader<'_>, _limits: &Limits) -> WireResult<Self> {
        Ok(Self {
            zone_id: reader.read_u16()?,
            map_instance: reader.read_u16()?,
            map_clone: reader.read_u32()?,
        })
    }
}

/// Tells the client which zone to load and where to spawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldInfo {
    /// `u16` zone id.
    pub zone_id: u16,
    /// `u16` map instance.
    pub map_instance: u16,
    /// `u32` map clone.
    pub map_clone: u32,
    /// `u32` checksum of the zone file the client must have.
    pub map_checksum: u32,
    /// `u16`, always zero.
    pub unknown1: u16,
    /// `f32` x, y, z spawn position.
    pub position: [f32; 3],
    /// `u32` activity flag.
    pub is_activity: u32,
}

impl WorldInfo {
    /// Creates the default world info for a zone: instance 0, clone 0, not an activity.
    #[must_use]
    pub const fn for_zone(zone_id: u16, map_checksum: u32, position: [f32; 3]) -> Self {
        Self {
            zone_id,
            map_instance: 0,
            map_clone: 0,
            map_checksum,
            unknown1: 0,
            position,
            is_activity: 0,
        }
    }
}

impl Packet for WorldInfo {
    const ID: PacketId = PacketId::WorldInfo;

    fn serialize_body(&self, writer: &mut BitWriter) -> Result<(), EncodeError> {
        writer.write_u16(self.zone_id);
        writer.write_u16(self.map_instance);
        writer.write_u32(self.map_clone);
        writer.write_u32(self.map_checksum);
        writer.write_u16(self.unknown1);
        for axis in self.position {
            writer.write_f32(axis);
        }
        writer.write_u32(self.is_activity);
        Ok(())
    }

    fn deserialize_body(reader: &mut BitReader<'_>, _limits: &Limits) -> WireResult<Self> {
        Ok(Self {
            zone_id: reader.read_u16()?,
            map_instance: reader.read_u16()?,
            map_clone: reader.read_u32()?,
            map_checksum: reader.read_u32()?,
            unknown1: reader.read_u16()?,
            position: [reader.read_f32()?, reader.read_f32()?, reader.read_f32()?],
            is_activity: reader.read_u32()?,
        })
    }
}

/// Character fields that feed [`DetailedUserInfo`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterDetails {
    pub account_id: i64,
    pub object_id: i64,
    pub name: String,
    pub zone_id: u16,
    pub inventory_space: u32,
    pub currency: i64,
    pub level: u32,
    pub reputation: i64,
}

/// The character's property list, carried as a framed LDF payload.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailedUserInfo {
    pub ldf: Ldf,
}

impl DetailedUserInfo {
    /// Builds the standard property set the client expects on world entry.
    pub fn for_character(details: &CharacterDetails) -> Result<Self, EncodeError> {
        let mut ldf = Ldf::new();
        ldf.write("accountID", details.account_id)?;
        ldf.write("chatmode", 1i32)?;
        ldf.write("editor_enabled", false)?;
        ldf.write("editor_level", 0i32)?;
        ldf.write("gmlevel", 0i32)?;
        ldf.write("levelid", i64::from(details.zone_id))?;
        ldf.write_as("objid", details.object_id, LdfType::ObjId)?;
        ldf.write("reputation", details.reputation)?;
        ldf.write("template", 1i32)?;
        ldf.write_as("xmlData", character_xml(details), LdfType::Bytes)?;
        ldf.write("name", details.name.as_str())?;
        Ok(Self { ldf })
    }
}

/// Character save document embedded in the user info.
fn character_xml(details: &CharacterDetails) -> String {
    format!(
        concat!(
            "<obj v=\"1\"><buff/><skill/>",
            "<inv><bag><b t=\"0\" m=\"{space}\"/></bag><items><in/></items></inv>",
            "<mf/><char cc=\"{currency}\"/><lvl l=\"{level}\"/>",
            "<flag/><pet/><mis/><mnt/><dest/></obj>"
        ),
        space = details.inventory_space,
        currency = details.currency,
        level = details.level,
    )
}

impl Packet for DetailedUserInfo {
    const ID: PacketId = PacketId::DetailedUserInfo;

    fn serialize_body(&self, writer: &mut BitWriter) -> Result<(), EncodeError> {
        self.ldf.write_framed(writer)?;
        Ok(())
    }

    fn deserialize_body(reader: &mut BitReader<'_>, limits: &Limits) -> WireResult<Self> {
        let ldf = FramedLdf::read(reader, &limits.ldf)?.into_plain()?;
        Ok(Self { ldf })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::{decode_as, encode_packet};
    use crate::HEADER_SIZE;
    use ldf::LdfValue;

    fn details() -> CharacterDetails {
        CharacterDetails {
            account_id: 1,
            object_id: 1_152_921_510_794_154_770,
            name: "Brickbuilder".to_owned(),
            zone_id: 1200,
            inventory_space: 8,
            currency: 0,
            level: 1,
            reputation: 100,
        }
    }

    #[test]
    fn join_world_request_layout() {
        let bytes = encode_packet(&JoinWorldRequest { character_id: 5 }).unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE + 8);
        assert_eq!(&bytes[HEADER_SIZE..], &5i64.to_le_bytes());
    }

    #[test]
    fn world_info_layout() {
        let info = WorldInfo::for_zone(1200, 0xDEAD_BEEF, [0.0, 1.0, 0.0]);
        let bytes = encode_packet(&info).unwrap();
        // 2 + 2 + 4 + 4 + 2 + 12 + 4
        assert_eq!(bytes.len(), HEADER_SIZE + 30);
        assert_eq!(&bytes[HEADER_SIZE..HEADER_SIZE + 2], &1200u16.to_le_bytes());
        assert_eq!(info.map_instance, 0);
        assert_eq!(info.map_clone, 0);
    }

    #[test]
    fn user_info_property_order() {
        let info = DetailedUserInfo::for_character(&details()).unwrap();
        let keys: Vec<&str> = info.ldf.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "accountID",
                "chatmode",
                "editor_enabled",
                "editor_level",
                "gmlevel",
                "levelid",
                "objid",
                "reputation",
                "template",
                "xmlData",
                "name"
            ]
        );
        assert_eq!(
            info.ldf.get("objid"),
            Some(&LdfValue::ObjId(1_152_921_510_794_154_770))
        );
        assert_eq!(info.ldf.get("levelid"), Some(&LdfValue::S64(1200)));
    }

    #[test]
    fn user_info_xml_carries_inventory_and_level() {
        let info = DetailedUserInfo::for_character(&details()).unwrap();
        let Some(LdfValue::Bytes(xml)) = info.ldf.get("xmlData") else {
            panic!("xmlData missing");
        };
        let xml = String::from_utf8(xml.clone()).unwrap();
        assert!(xml.starts_with("<obj v=\"1\">"));
        assert!(xml.contains("<b t=\"0\" m=\"8\"/>"));
        assert!(xml.contains("<lvl l=\"1\"/>"));
    }

    #[test]
    fn user_info_frame_length_prefix() {
        let info = DetailedUserInfo::for_character(&details()).unwrap();
        let bytes = encode_packet(&info).unwrap();
        let body = &bytes[HEADER_SIZE..];
        let total = u32::from_le_bytes(body[0..4].try_into().unwrap()) as usize;
        assert_eq!(total, body.len());
        assert_eq!(body[4], 0);

        let decoded = decode_as::<DetailedUserInfo>(&bytes, &Limits::default()).unwrap();
        assert_eq!(decoded, info);
    }
}
