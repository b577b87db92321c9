//! LDF value kinds and their wire tags.

use bitstream::{BitReader, BitWriter};

use crate::error::{LdfError, LdfResult};
use crate::limits::Limits;
use crate::LimitKind;

/// The closed set of LDF value kinds, keyed by their numeric wire tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum LdfType {
    WString = 0,
    S32 = 1,
    F32 = 3,
    F64 = 4,
    U32 = 5,
    Bool = 7,
    S64 = 8,
    ObjId = 9,
    Bytes = 13,
}

impl LdfType {
    /// Parses a type tag from a raw byte.
    pub fn parse(tag: u8) -> LdfResult<Self> {
        match tag {
            0 => Ok(Self::WString),
            1 => Ok(Self::S32),
            3 => Ok(Self::F32),
            4 => Ok(Self::F64),
            5 => Ok(Self::U32),
            7 => Ok(Self::Bool),
            8 => Ok(Self::S64),
            9 => Ok(Self::ObjId),
            13 => Ok(Self::Bytes),
            _ => Err(LdfError::UnknownType { tag }),
        }
    }

    /// Returns the wire tag.
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }
}

/// A typed LDF value. The variant fixes the wire tag.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LdfValue {
    /// UTF-16 string with a `u32` code-unit count.
    WString(String),
    S32(i32),
    F32(f32),
    F64(f64),
    U32(u32),
    /// One byte on the wire.
    Bool(bool),
    S64(i64),
    /// Object id; same layout as `S64`, distinct tag.
    ObjId(i64),
    /// Raw bytes with a `u32` length (carries XML blobs).
    Bytes(Vec<u8>),
}

impl LdfValue {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> LdfType {
        match self {
            Self::WString(_) => LdfType::WString,
            Self::S32(_) => LdfType::S32,
            Self::F32(_) => LdfType::F32,
            Self::F64(_) => LdfType::F64,
            Self::U32(_) => LdfType::U32,
            Self::Bool(_) => LdfType::Bool,
            Self::S64(_) => LdfType::S64,
            Self::ObjId(_) => LdfType::ObjId,
            Self::Bytes(_) => LdfType::Bytes,
        }
    }

    /// Reinterprets this value under another tag.
    ///
    /// Integer kinds convert when the value fits; strings may be carried as
    /// UTF-8 bytes.
    pub fn retag(self, ty: LdfType) -> LdfResult<Self> {
        let found = self.kind();
        if found == ty {
            return Ok(self);
        }
        let incompatible = LdfError::IncompatibleType {
            requested: ty,
            found,
        };
        match (self, ty) {
            (Self::S64(v), LdfType::ObjId) => Ok(Self::ObjId(v)),
            (Self::ObjId(v), LdfType::S64) => Ok(Self::S64(v)),
            (Self::S32(v), LdfType::S64) => Ok(Self::S64(i64::from(v))),
            (Self::S32(v), LdfType::ObjId) => Ok(Self::ObjId(i64::from(v))),
            (Self::S32(v), LdfType::U32) => u32::try_from(v).map(Self::U32).map_err(|_| incompatible),
            (Self::U32(v), LdfType::S32) => i32::try_from(v).map(Self::S32).map_err(|_| incompatible),
            (Self::U32(v), LdfType::S64) => Ok(Self::S64(i64::from(v))),
            (Self::F32(v), LdfType::F64) => Ok(Self::F64(f64::from(v))),
            (Self::WString(v), LdfType::Bytes) => Ok(Self::Bytes(v.into_bytes())),
            _ => Err(incompatible),
        }
    }

    pub(crate) fn encode(&self, writer: &mut BitWriter) -> LdfResult<()> {
        match self {
            Self::WString(s) => {
                let units: Vec<u16> = s.encode_utf16().collect();
                let len = u32::try_from(units.len())
                    .map_err(|_| LdfError::ValueTooLong { len: units.len() })?;
                writer.write_u32(len);
                for unit in units {
                    writer.write_u16(unit);
                }
            }
            Self::S32(v) => writer.write_i32(*v),
            Self::F32(v) => writer.write_f32(*v),
            Self::F64(v) => writer.write_f64(*v),
            Self::U32(v) => writer.write_u32(*v),
            Self::Bool(v) => writer.write_u8(u8::from(*v)),
            Self::S64(v) | Self::ObjId(v) => writer.write_i64(*v),
            Self::Bytes(bytes) => {
                let len = u32::try_from(bytes.len())
                    .map_err(|_| LdfError::ValueTooLong { len: bytes.len() })?;
                writer.write_u32(len);
                writer.write_bytes(bytes);
            }
        }
        Ok(())
    }

    pub(crate) fn decode(
        ty: LdfType,
        reader: &mut BitReader<'_>,
        limits: &Limits,
    ) -> LdfResult<Self> {
        let value = match ty {
            LdfType::WString => {
                let units = reader.read_u32()? as usize;
                check_value_len(units.saturating_mul(2), limits)?;
                let mut buf = Vec::with_capacity(units);
                for _ in 0..units {
                    buf.push(reader.read_u16()?);
                }
                Self::WString(String::from_utf16(&buf).map_err(|_| LdfError::InvalidUtf16)?)
            }
            LdfType::S32 => Self::S32(reader.read_i32()?),
            LdfType::F32 => Self::F32(reader.read_f32()?),
            LdfType::F64 => Self::F64(reader.read_f64()?),
            LdfType::U32 => Self::U32(reader.read_u32()?),
            LdfType::Bool => match reader.read_u8()? {
                0 => Self::Bool(false),
                1 => Self::Bool(true),
                byte => return Err(LdfError::InvalidBool { byte }),
            },
            LdfType::S64 => Self::S64(reader.read_i64()?),
            LdfType::ObjId => Self::ObjId(reader.read_i64()?),
            LdfType::Bytes => {
                let len = reader.read_u32()? as usize;
                check_value_len(len, limits)?;
                Self::Bytes(reader.read_bytes(len)?)
            }
        };
        Ok(value)
    }
}

fn check_value_len(len: usize, limits: &Limits) -> LdfResult<()> {
    if len > limits.max_value_bytes {
        return Err(LdfError::LimitsExceeded {
            kind: LimitKind::ValueBytes,
            limit: limits.max_value_bytes,
            actual: len,
        });
    }
    Ok(())
}

impl From<i32> for LdfValue {
    fn from(v: i32) -> Self {
        Self::S32(v)
    }
}

impl From<u32> for LdfValue {
    fn from(v: u32) -> Self {
        Self::U32(v)
    }
}

impl From<i64> for LdfValue {
    fn from(v: i64) -> Self {
        Self::S64(v)
    }
}

impl From<f32> for LdfValue {
    fn from(v: f32) -> Self {
        Self::F32(v)
    }
}

impl From<f64> for LdfValue {
    fn from(v: f64) -> Self {
        Self::F64(v)
    }
}

impl From<bool> for LdfValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for LdfValue {
    fn from(v: &str) -> Self {
        Self::WString(v.to_owned())
    }
}

impl From<String> for LdfValue {
    fn from(v: String) -> Self {
        Self::WString(v)
    }
}
