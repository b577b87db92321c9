//! Typed key/value (LDF) payloads for the lunet game protocol.
//!
//! An [`Ldf`] is an ordered list of `(key, value)` entries drawn from a closed
//! set of primitive kinds, each tagged with a numeric [`LdfType`]. It is used
//! to carry ancillary structured state inside a larger packet without tying
//! that packet's layout to the property set.
//!
//! # Wire format
//!
//! Body: `u32 entry_count`, then per entry `u8 key_len` (bytes),
//! the key as UTF-16LE, `u8 type_tag`, and the value.
//!
//! Framed: `[u32 total_length][u8 compressed][body]`, where `total_length`
//! covers the whole frame. A containing packet can skip the frame without
//! interpreting it.
//!
//! # Example
//!
//! ```
//! use bitstream::{BitReader, BitWriter};
//! use ldf::{FramedLdf, Ldf, LdfType, LdfValue, Limits};
//!
//! let mut ldf = Ldf::new();
//! ldf.write("chatmode", 1i32).unwrap();
//! ldf.write_as("objid", 1_152_921_510_794_154_770i64, LdfType::ObjId).unwrap();
//!
//! let mut writer = BitWriter::new();
//! ldf.write_framed(&mut writer).unwrap();
//! let bytes = writer.finish();
//!
//! let mut reader = BitReader::new(&bytes);
//! let FramedLdf::Plain(decoded) = FramedLdf::read(&mut reader, &Limits::default()).unwrap() else {
//!     panic!("not compressed");
//! };
//! assert_eq!(decoded, ldf);
//! assert_eq!(decoded.get("chatmode"), Some(&LdfValue::S32(1)));
//! ```

mod error;
mod limits;
mod value;

use bitstream::{BitReader, BitWriter};

pub use error::{LdfError, LdfResult, LimitKind};
pub use limits::Limits;
pub use value::{LdfType, LdfValue};

/// Bytes taken by the frame header (`u32` length + `u8` compressed flag).
pub const FRAME_HEADER_SIZE: usize = 5;

/// One `(key, value)` pair.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LdfEntry {
    pub key: String,
    pub value: LdfValue,
}

/// An ordered LDF property list.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ldf {
    entries: Vec<LdfEntry>,
}

impl Ldf {
    /// Creates an empty property list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry tagged by the value's own kind.
    pub fn write(&mut self, key: &str, value: impl Into<LdfValue>) -> LdfResult<()> {
        let bytes = key.encode_utf16().count() * 2;
        if bytes > usize::from(u8::MAX) {
            return Err(LdfError::KeyTooLong { bytes });
        }
        self.entries.push(LdfEntry {
            key: key.to_owned(),
            value: value.into(),
        });
        Ok(())
    }

    /// Appends an entry under an explicit type tag.
    pub fn write_as(
        &mut self,
        key: &str,
        value: impl Into<LdfValue>,
        ty: LdfType,
    ) -> LdfResult<()> {
        let value = value.into().retag(ty)?;
        self.write(key, value)
    }

    /// Returns the first value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&LdfValue> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| &entry.value)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &LdfEntry> {
        self.entries.iter()
    }

    /// Encodes the body (count + entries) into `writer`.
    pub fn encode(&self, writer: &mut BitWriter) -> LdfResult<()> {
        let count = u32::try_from(self.entries.len()).map_err(|_| LdfError::LimitsExceeded {
            kind: LimitKind::Entries,
            limit: u32::MAX as usize,
            actual: self.entries.len(),
        })?;
        writer.write_u32(count);
        for entry in &self.entries {
            let units: Vec<u16> = entry.key.encode_utf16().collect();
            let key_bytes = u8::try_from(units.len() * 2).map_err(|_| LdfError::KeyTooLong {
                bytes: units.len() * 2,
            })?;
            writer.write_u8(key_bytes);
            for unit in units {
                writer.write_u16(unit);
            }
            writer.write_u8(entry.value.kind().tag());
            entry.value.encode(writer)?;
        }
        Ok(())
    }

    /// Encodes the body into a fresh byte buffer.
    pub fn to_bytes(&self) -> LdfResult<Vec<u8>> {
        let mut writer = BitWriter::new();
        self.encode(&mut writer)?;
        Ok(writer.finish())
    }

    /// Decodes a body (count + entries) from `reader`.
    pub fn decode(reader: &mut BitReader<'_>, limits: &Limits) -> LdfResult<Self> {
        let count = reader.read_u32()? as usize;
        if count > limits.max_entries {
            return Err(LdfError::LimitsExceeded {
                kind: LimitKind::Entries,
                limit: limits.max_entries,
                actual: count,
            });
        }

        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let key_bytes = reader.read_u8()?;
            if usize::from(key_bytes) > limits.max_key_bytes {
                return Err(LdfError::LimitsExceeded {
                    kind: LimitKind::KeyBytes,
                    limit: limits.max_key_bytes,
                    actual: usize::from(key_bytes),
                });
            }
            if key_bytes % 2 != 0 {
                return Err(LdfError::OddKeyLength { bytes: key_bytes });
            }
            let mut units = Vec::with_capacity(usize::from(key_bytes / 2));
            for _ in 0..key_bytes / 2 {
                units.push(reader.read_u16()?);
            }
            let key = String::from_utf16(&units).map_err(|_| LdfError::InvalidUtf16)?;
            let ty = LdfType::parse(reader.read_u8()?)?;
            let value = LdfValue::decode(ty, reader, limits)?;
            entries.push(LdfEntry { key, value });
        }
        Ok(Self { entries })
    }

    /// Writes the framed form: `[u32 total_length][u8 compressed = 0][body]`.
    pub fn write_framed(&self, writer: &mut BitWriter) -> LdfResult<()> {
        let body = self.to_bytes()?;
        let total = body.len() + FRAME_HEADER_SIZE;
        let total = u32::try_from(total).map_err(|_| LdfError::ValueTooLong { len: total })?;
        writer.write_u32(total);
        writer.write_u8(0);
        writer.write_bytes(&body);
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Ldf {
    type Item = &'a LdfEntry;
    type IntoIter = std::slice::Iter<'a, LdfEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A framed LDF payload as read off the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum FramedLdf {
    /// Uncompressed payload, fully decoded.
    Plain(Ldf),
    /// Compressed payload, kept opaque.
    Compressed(Vec<u8>),
}

impl FramedLdf {
    /// Reads one frame, decoding the body when it is not compressed.
    pub fn read(reader: &mut BitReader<'_>, limits: &Limits) -> LdfResult<Self> {
        let (compressed, body) = read_frame(reader, limits)?;
        if compressed {
            return Ok(Self::Compressed(body));
        }
        let mut body_reader = BitReader::new(&body);
        let ldf = Ldf::decode(&mut body_reader, limits)?;
        if !body_reader.is_empty() {
            return Err(LdfError::TrailingBytes {
                remaining: body_reader.bytes_remaining(),
            });
        }
        Ok(Self::Plain(ldf))
    }

    /// Writes this frame back out.
    pub fn write(&self, writer: &mut BitWriter) -> LdfResult<()> {
        match self {
            Self::Plain(ldf) => ldf.write_framed(writer),
            Self::Compressed(body) => {
                let total = body.len() + FRAME_HEADER_SIZE;
                let total =
                    u32::try_from(total).map_err(|_| LdfError::ValueTooLong { len: total })?;
                writer.write_u32(total);
                writer.write_u8(1);
                writer.write_bytes(body);
                Ok(())
            }
        }
    }

    /// Returns the decoded list, or [`LdfError::Compressed`].
    pub fn into_plain(self) -> LdfResult<Ldf> {
        match self {
            Self::Plain(ldf) => Ok(ldf),
            Self::Compressed(_) => Err(LdfError::Compressed),
        }
    }
}

/// Skips over one frame without interpreting its body.
pub fn skip_framed(reader: &mut BitReader<'_>, limits: &Limits) -> LdfResult<()> {
    let body_len = read_frame_len(reader, limits)?.saturating_sub(FRAME_HEADER_SIZE);
    reader.skip_bits(8)?; // compressed flag
    reader.skip_bits(body_len.saturating_mul(8))?;
    Ok(())
}

fn read_frame_len(reader: &mut BitReader<'_>, limits: &Limits) -> LdfResult<usize> {
    let declared = reader.read_u32()?;
    let total = declared as usize;
    if total < FRAME_HEADER_SIZE {
        return Err(LdfError::LengthMismatch {
            declared,
            minimum: FRAME_HEADER_SIZE,
        });
    }
    if total > limits.max_framed_bytes {
        return Err(LdfError::LimitsExceeded {
            kind: LimitKind::FramedBytes,
            limit: limits.max_framed_bytes,
            actual: total,
        });
    }
    Ok(total)
}

fn read_frame(reader: &mut BitReader<'_>, limits: &Limits) -> LdfResult<(bool, Vec<u8>)> {
    let body_len = read_frame_len(reader, limits)?.saturating_sub(FRAME_HEADER_SIZE);
    let compressed = reader.read_u8()? != 0;
    let body = reader.read_bytes(body_len)?;
    Ok((compressed, body))
}
