//! Compact variable-length unsigned integers.
//!
//! | value range              | encoding                 |
//! |--------------------------|--------------------------|
//! | `< 0xfd`                 | 1 byte                   |
//! | `<= 0xffff`              | `0xfd` + u16 little-endian |
//! | `<= 0xffff_ffff`         | `0xfe` + u32 little-endian |
//! | otherwise                | `0xff` + u64 little-endian |
//!
//! Decoding rejects encodings that are longer than necessary, so every value
//! has exactly one byte representation.

use std::io::Write;

use crate::CodecError;

pub(crate) const TAG_U16: u8 = 0xfd;
pub(crate) const TAG_U32: u8 = 0xfe;
pub(crate) const TAG_U64: u8 = 0xff;

/// Number of bytes `value` occupies once encoded.
pub fn varint_len(value: u64) -> usize {
    if value < TAG_U16 as u64 {
        1
    } else if value <= u16::MAX as u64 {
        3
    } else if value <= u32::MAX as u64 {
        5
    } else {
        9
    }
}

/// Write `value` in its canonical varint form.
pub fn write_varint<W: Write + ?Sized>(out: &mut W, value: u64) -> Result<(), CodecError> {
    if value < TAG_U16 as u64 {
        out.write_all(&[value as u8])?;
    } else if value <= u16::MAX as u64 {
        out.write_all(&[TAG_U16])?;
        out.write_all(&(value as u16).to_le_bytes())?;
    } else if value <= u32::MAX as u64 {
        out.write_all(&[TAG_U32])?;
        out.write_all(&(value as u32).to_le_bytes())?;
    } else {
        out.write_all(&[TAG_U64])?;
        out.write_all(&value.to_le_bytes())?;
    }
    Ok(())
}
