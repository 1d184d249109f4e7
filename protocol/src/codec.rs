//! The `WireCodec` contract and field-level write helpers.

use std::io::Write;

use poc_types::{Address, Na, PublicKey, Signature, Timestamp, TxHash};

use crate::varint::{varint_len, write_varint};
use crate::{ByteReader, CodecError};

/// Width of an encoded double.
pub const F64_LEN: usize = 8;

/// Canonical serialization of a consensus entity.
///
/// `encoded_len` must equal the number of bytes `write_to` produces; the
/// provided `to_bytes` enforces that on every encode.
pub trait WireCodec: Sized {
    fn encoded_len(&self) -> usize;

    fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<(), CodecError>;

    fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, CodecError>;

    fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let computed = self.encoded_len();
        let mut out = Vec::with_capacity(computed);
        self.write_to(&mut out)?;
        if out.len() != computed {
            return Err(CodecError::SizeMismatch {
                computed,
                written: out.len(),
            });
        }
        Ok(out)
    }

    /// Decode a value that must span the whole input.
    fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut reader = ByteReader::new(bytes);
        let value = Self::read_from(&mut reader)?;
        if !reader.is_empty() {
            return Err(CodecError::TrailingBytes(reader.remaining()));
        }
        Ok(value)
    }
}

pub fn bytes_len(len: usize) -> usize {
    varint_len(len as u64) + len
}

pub fn string_len(value: &str) -> usize {
    bytes_len(value.len())
}

pub fn write_bytes<W: Write + ?Sized>(out: &mut W, bytes: &[u8]) -> Result<(), CodecError> {
    write_varint(out, bytes.len() as u64)?;
    out.write_all(bytes)?;
    Ok(())
}

pub fn write_string<W: Write + ?Sized>(out: &mut W, value: &str) -> Result<(), CodecError> {
    write_bytes(out, value.as_bytes())
}

pub fn write_f64<W: Write + ?Sized>(out: &mut W, value: f64) -> Result<(), CodecError> {
    out.write_all(&value.to_le_bytes())?;
    Ok(())
}

impl WireCodec for u64 {
    fn encoded_len(&self) -> usize {
        varint_len(*self)
    }

    fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<(), CodecError> {
        write_varint(out, *self)
    }

    fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        reader.read_varint()
    }
}

impl WireCodec for f64 {
    fn encoded_len(&self) -> usize {
        F64_LEN
    }

    fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<(), CodecError> {
        write_f64(out, *self)
    }

    fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        reader.read_f64()
    }
}

impl WireCodec for String {
    fn encoded_len(&self) -> usize {
        string_len(self)
    }

    fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<(), CodecError> {
        write_string(out, self)
    }

    fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        reader.read_string()
    }
}

impl WireCodec for Na {
    fn encoded_len(&self) -> usize {
        varint_len(self.value())
    }

    fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<(), CodecError> {
        write_varint(out, self.value())
    }

    fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        reader.read_varint().map(Na::new)
    }
}

impl WireCodec for Timestamp {
    fn encoded_len(&self) -> usize {
        varint_len(self.as_secs())
    }

    fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<(), CodecError> {
        write_varint(out, self.as_secs())
    }

    fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        reader.read_varint().map(Timestamp::new)
    }
}

impl WireCodec for Address {
    fn encoded_len(&self) -> usize {
        string_len(self.as_str())
    }

    fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<(), CodecError> {
        write_string(out, self.as_str())
    }

    fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        let raw = reader.read_string()?;
        Address::parse(raw).map_err(|e| CodecError::InvalidValue {
            field: "address",
            reason: e.to_string(),
        })
    }
}

/// Hashes travel length-prefixed so a future digest width stays decodable.
impl WireCodec for TxHash {
    fn encoded_len(&self) -> usize {
        bytes_len(TxHash::LEN)
    }

    fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<(), CodecError> {
        write_bytes(out, self.as_bytes())
    }

    fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        let bytes = reader.read_bytes()?;
        TxHash::from_slice(bytes).ok_or_else(|| CodecError::InvalidValue {
            field: "hash",
            reason: format!("expected {} bytes, got {}", TxHash::LEN, bytes.len()),
        })
    }
}

impl WireCodec for PublicKey {
    fn encoded_len(&self) -> usize {
        bytes_len(32)
    }

    fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<(), CodecError> {
        write_bytes(out, self.as_bytes())
    }

    fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        let bytes = reader.read_bytes()?;
        PublicKey::from_slice(bytes).ok_or_else(|| CodecError::InvalidValue {
            field: "public key",
            reason: format!("expected 32 bytes, got {}", bytes.len()),
        })
    }
}

impl WireCodec for Signature {
    fn encoded_len(&self) -> usize {
        bytes_len(64)
    }

    fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<(), CodecError> {
        write_bytes(out, self.as_bytes())
    }

    fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        let bytes = reader.read_bytes()?;
        Signature::from_slice(bytes).ok_or_else(|| CodecError::InvalidValue {
            field: "signature",
            reason: format!("expected 64 bytes, got {}", bytes.len()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_is_length_prefixed() {
        let bytes = String::from("abc").to_bytes().unwrap();
        assert_eq!(bytes, vec![0x03, b'a', b'b', b'c']);
    }

    #[test]
    fn empty_string_is_single_zero_byte() {
        assert_eq!(String::new().to_bytes().unwrap(), vec![0x00]);
    }

    #[test]
    fn double_is_little_endian_ieee754() {
        assert_eq!(
            0.1f64.to_bytes().unwrap(),
            vec![0x9a, 0x99, 0x99, 0x99, 0x99, 0x99, 0xb9, 0x3f]
        );
    }

    #[test]
    fn trailing_bytes_rejected() {
        assert!(matches!(
            u64::from_bytes(&[0x05, 0x00]),
            Err(CodecError::TrailingBytes(1))
        ));
    }

    #[test]
    fn hash_of_wrong_width_rejected() {
        let err = TxHash::from_bytes(&[0x02, 0xaa, 0xbb]).unwrap_err();
        assert!(err.is_malformed());
        assert!(matches!(err, CodecError::InvalidValue { field: "hash", .. }));
    }

    #[test]
    fn short_sink_surfaces_io_error() {
        let mut buf = [0u8; 2];
        let mut sink: &mut [u8] = &mut buf;
        let err = String::from("hello").write_to(&mut sink).unwrap_err();
        assert!(matches!(err, CodecError::Io(_)));
        assert!(!err.is_malformed());
    }

    #[test]
    fn hash_roundtrip_keeps_bytes() {
        let hash = TxHash::new([9u8; 32]);
        let bytes = hash.to_bytes().unwrap();
        assert_eq!(bytes.len(), 33);
        assert_eq!(TxHash::from_bytes(&bytes).unwrap(), hash);
    }
}
