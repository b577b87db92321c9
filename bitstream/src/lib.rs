//! Bit-level read/write primitives for the lunet game protocol.
//!
//! This crate provides [`BitWriter`] and [`BitReader`], the codec every packet,
//! game message and replica encoding is built on. The layout matches the
//! client's bitstream: bits fill bytes from the most significant bit, and
//! multi-byte values are written as little-endian bytes at the current bit
//! position.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded operations** - All reads are bounds-checked.
//! - **No domain knowledge** - This crate knows nothing about packets or replicas.
//! - **Explicit errors** - A short buffer yields [`BitError::TruncatedStream`], never a panic.
//!
//! # Example
//!
//! ```
//! use bitstream::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bool(true);
//! writer.write_i64(12345);
//! writer.write_u16(1200);
//!
//! let bytes = writer.finish();
//!
//! let mut reader = BitReader::new(&bytes);
//! assert!(reader.read_bool().unwrap());
//! assert_eq!(reader.read_i64().unwrap(), 12345);
//! assert_eq!(reader.read_u16().unwrap(), 1200);
//! ```

mod error;
mod reader;
mod writer;

pub use error::{BitError, BitResult};
pub use reader::BitReader;
pub use writer::BitWriter;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_written_nothing_read() {
        let bytes = BitWriter::new().finish();
        assert!(bytes.is_empty());
        let mut reader = BitReader::new(&bytes);
        assert!(reader.is_empty());
        assert!(reader.read_bool().is_err());
    }

    #[test]
    fn game_message_header_fields() {
        // object id, message id, then an unaligned flag and a mission id.
        let mut writer = BitWriter::new();
        writer.write_i64(1_152_921_504_606_846_994);
        writer.write_u16(520);
        writer.write_bool(true);
        writer.write_i32(700);
        writer.write_f32(-0.5);
        let bytes = writer.finish();
        assert_eq!(bytes.len(), 8 + 2 + 4 + 4 + 1);

        let mut reader = BitReader::new(&bytes);
        assert_eq!(reader.read_i64().unwrap(), 1_152_921_504_606_846_994);
        assert_eq!(reader.read_u16().unwrap(), 520);
        assert!(reader.read_bool().unwrap());
        assert_eq!(reader.read_i32().unwrap(), 700);
        assert_eq!(reader.read_f32().unwrap(), -0.5);
        assert!(reader.bits_remaining() < 8);
    }

    #[test]
    fn raw_fields_up_to_a_word() {
        for (value, bits) in [(0b101u64, 3), (0x7F, 7), (0x3_FFFF, 18), (u64::MAX, 64)] {
            let mut writer = BitWriter::new();
            writer.write_bits(value, bits).unwrap();
            let bytes = writer.finish();
            let mut reader = BitReader::new(&bytes);
            assert_eq!(reader.read_bits(bits).unwrap(), value, "{bits}-bit field");
        }
    }
}
