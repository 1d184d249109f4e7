//! Canonical binary encoding shared by every consensus entity.
//!
//! The encoding is the input to transaction hashing, so it must be
//! bit-exact across implementations:
//!
//! - unsigned integers: compact varint (see [`varint`])
//! - strings and byte strings: varint length prefix + raw bytes (UTF-8 for strings)
//! - doubles: 8-byte little-endian IEEE-754
//!
//! Entities implement [`WireCodec`]; decoding goes through [`ByteReader`].

pub mod codec;
pub mod error;
pub mod reader;
pub mod varint;

pub use codec::{bytes_len, string_len, write_bytes, write_f64, write_string, WireCodec, F64_LEN};
pub use error::CodecError;
pub use reader::ByteReader;
pub use varint::{varint_len, write_varint};
