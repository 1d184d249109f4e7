//! Cursor over an encoded byte slice.

use crate::varint::{TAG_U16, TAG_U32, TAG_U64};
use crate::{CodecError, WireCodec};

/// Consumes bytes from the front of a borrowed slice.
///
/// Every read checks the remaining length first, so a hostile length prefix
/// fails before anything is allocated.
pub struct ByteReader<'a> {
    input: &'a [u8],
}

impl<'a> ByteReader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input }
    }

    pub fn remaining(&self) -> usize {
        self.input.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Take exactly `n` bytes.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        if self.input.len() < n {
            return Err(CodecError::UnexpectedEof {
                needed: n,
                remaining: self.input.len(),
            });
        }
        let (head, tail) = self.input.split_at(n);
        self.input = tail;
        Ok(head)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_varint(&mut self) -> Result<u64, CodecError> {
        let (value, min) = match self.read_u8()? {
            TAG_U16 => (u16::from_le_bytes(self.take_array()?) as u64, TAG_U16 as u64),
            TAG_U32 => (u32::from_le_bytes(self.take_array()?) as u64, 0x1_0000),
            TAG_U64 => (u64::from_le_bytes(self.take_array()?), 0x1_0000_0000),
            small => return Ok(small as u64),
        };
        if value < min {
            return Err(CodecError::NonCanonicalVarint);
        }
        Ok(value)
    }

    pub fn read_f64(&mut self) -> Result<f64, CodecError> {
        Ok(f64::from_le_bytes(self.take_array()?))
    }

    /// Read a varint length prefix followed by that many bytes.
    pub fn read_bytes(&mut self) -> Result<&'a [u8], CodecError> {
        let declared = self.read_varint()?;
        let remaining = self.input.len();
        match usize::try_from(declared) {
            Ok(len) if len <= remaining => self.take(len),
            _ => Err(CodecError::LengthOverflow {
                declared,
                remaining,
            }),
        }
    }

    pub fn read_string(&mut self) -> Result<String, CodecError> {
        let bytes = self.read_bytes()?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| CodecError::InvalidUtf8)
    }

    /// Decode a nested entity.
    pub fn read<T: WireCodec>(&mut self) -> Result<T, CodecError> {
        T::read_from(self)
    }
}
