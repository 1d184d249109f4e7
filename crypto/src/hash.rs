//! Blake2b-256 digests.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use poc_types::TxHash;

type Blake2b256 = Blake2b<U32>;

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    blake2b_256_multi(&[data])
}

/// Hash multiple byte slices in sequence without concatenating them.
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// Digest the canonical unsigned encoding of a transaction.
pub fn hash_transaction(unsigned_bytes: &[u8]) -> TxHash {
    TxHash::new(blake2b_256(unsigned_bytes))
}
