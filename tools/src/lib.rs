//! Inspection and debugging tools for the lunet game protocol.
//!
//! This crate turns captured packets and LDF blobs into structured reports:
//!
//! - Decode a packet and describe its header and fields
//! - Dump the entries of a framed LDF blob
//! - Look up zone checksums from a server configuration
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Reports serialize to JSON and print as plain text.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use bitstream::BitReader;
use ldf::{FramedLdf, Ldf, LdfValue};
use serde::Serialize;
use serde_json::{json, Value};
use server::ServerConfig;
use tracing::debug;
use wire::{decode_packet, GameMessageId, Inbound, Limits, PacketHeader};

/// Structured description of one decoded packet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectReport {
    pub packet: String,
    pub remote: u16,
    pub code: u32,
    pub size: usize,
    pub fields: Value,
}

/// One LDF entry, flattened for output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LdfEntryReport {
    pub key: String,
    pub tag: u8,
    pub value: LdfValue,
}

/// Contents of a framed LDF blob.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LdfReport {
    Plain { entries: Vec<LdfEntryReport> },
    Compressed { bytes: usize },
}

/// Decodes a packet and describes it.
pub fn inspect_packet(bytes: &[u8], limits: &Limits) -> Result<InspectReport> {
    let packet = decode_packet(bytes, limits).context("decode packet")?;
    let header: PacketHeader = packet.id().header();
    debug!(packet = ?packet.id(), len = bytes.len(), "decoded packet");
    Ok(InspectReport {
        packet: format!("{:?}", packet.id()),
        remote: header.remote,
        code: header.code,
        size: bytes.len(),
        fields: packet_fields(&packet),
    })
}

fn packet_fields(packet: &Inbound) -> Value {
    match packet {
        Inbound::JoinWorldRequest(p) => json!({ "character_id": p.character_id }),
        Inbound::ClientLoadComplete(p) => json!({
            "zone_id": p.zone_id,
            "map_instance": p.map_instance,
            "map_clone": p.map_clone,
        }),
        Inbound::WorldInfo(p) => json!({
            "zone_id": p.zone_id,
            "map_instance": p.map_instance,
            "map_clone": p.map_clone,
            "map_checksum": format!("0x{:08x}", p.map_checksum),
            "position": p.position,
            "is_activity": p.is_activity,
        }),
        Inbound::DetailedUserInfo(p) => json!({ "ldf": ldf_entries(&p.ldf) }),
        Inbound::ClientGameMessage(p) => {
            game_message_fields(p.object_id, p.message_id, &p.payload)
        }
        Inbound::ServerGameMessage(p) => {
            game_message_fields(p.object_id, p.message_id, &p.payload)
        }
    }
}

fn game_message_fields(object_id: i64, message_id: u16, payload: &[u8]) -> Value {
    let name = GameMessageId::from_raw(message_id).map(|id| format!("{id:?}"));
    json!({
        "object_id": object_id,
        "message_id": message_id,
        "message": name,
        "payload": hex(payload),
    })
}

fn ldf_entries(ldf: &Ldf) -> Vec<LdfEntryReport> {
    ldf.iter()
        .map(|entry| LdfEntryReport {
            key: entry.key.clone(),
            tag: entry.value.kind().tag(),
            value: entry.value.clone(),
        })
        .collect()
}

/// Reads a framed LDF blob (`[u32 total][u8 compressed][body]`).
pub fn dump_ldf(bytes: &[u8], limits: &ldf::Limits) -> Result<LdfReport> {
    let mut reader = BitReader::new(bytes);
    let framed = FramedLdf::read(&mut reader, limits).context("read framed ldf")?;
    if reader.bytes_remaining() > 0 {
        debug!(remaining = reader.bytes_remaining(), "bytes after ldf frame ignored");
    }
    Ok(match framed {
        FramedLdf::Plain(ldf) => LdfReport::Plain {
            entries: ldf_entries(&ldf),
        },
        FramedLdf::Compressed(data) => LdfReport::Compressed { bytes: data.len() },
    })
}

/// Loads a server configuration from JSON. Missing fields take defaults.
pub fn load_config(path: &Path) -> Result<ServerConfig> {
    debug!(path = %path.display(), "loading config");
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    serde_json::from_str(&contents).context("parse config json")
}

/// Lowercase hex, no separators.
#[must_use]
pub fn hex(bytes: &[u8]) -> String {
    use std::fmt::Write;

    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

/// Renders a report as indented text.
#[must_use]
pub fn format_report_pretty(report: &InspectReport) -> String {
    let mut out = format!(
        "{} (remote {}, code 0x{:02x}, {} bytes)\n",
        report.packet, report.remote, report.code, report.size
    );
    if let Value::Object(fields) = &report.fields {
        for (name, value) in fields {
            out.push_str(&format!("  {name}: {value}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use wire::{encode_packet, ClientGameMessage, WorldInfo};

    #[test]
    fn inspect_world_info() {
        let bytes = encode_packet(&WorldInfo::for_zone(1000, 0x20b8_087c, [0.0, 1.0, 0.0])).unwrap();
        let report = inspect_packet(&bytes, &Limits::default()).unwrap();
        assert_eq!(report.packet, "WorldInfo");
        assert_eq!(report.remote, 5);
        assert_eq!(report.code, 0x02);
        assert_eq!(report.fields["zone_id"], 1000);
        assert_eq!(report.fields["map_checksum"], "0x20b8087c");
    }

    #[test]
    fn inspect_names_known_game_messages() {
        let message = ClientGameMessage::new(1, GameMessageId::RequestUse, vec![0xAB]);
        let bytes = encode_packet(&message).unwrap();
        let report = inspect_packet(&bytes, &Limits::default()).unwrap();
        assert_eq!(report.fields["message"], "RequestUse");
        assert_eq!(report.fields["payload"], "ab");
        assert!(format_report_pretty(&report).contains("message_id: 364"));
    }

    #[test]
    fn dump_plain_ldf() {
        let mut ldf = Ldf::new();
        ldf.write("template", 1i32).unwrap();
        let mut writer = bitstream::BitWriter::new();
        ldf.write_framed(&mut writer).unwrap();
        let report = dump_ldf(&writer.finish(), &ldf::Limits::default()).unwrap();
        let LdfReport::Plain { entries } = report else {
            panic!("expected plain ldf");
        };
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key, "template");
        assert_eq!(entries[0].tag, 1);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let path = std::env::temp_dir().join(format!("lunet-config-{}.json", std::process::id()));
        fs::write(&path, r#"{ "zone_checksums": { "1200": 3659426608 } }"#).unwrap();
        let config = load_config(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(config.zone_checksum(1200), Some(0xda1e_6b30));
        assert_eq!(config.zone_checksum(1000), None);
        assert_eq!(config.player, ServerConfig::default().player);
    }

    #[test]
    fn inspect_rejects_garbage() {
        assert!(inspect_packet(&[1, 2, 3], &Limits::default()).is_err());
    }
}
