//! Account address derivation from public keys.
//!
//! Address format: `poc_` + base32(public_key, 52 chars) + base32(checksum, 8 chars)
//!
//! Checksum: first 5 bytes of Blake2b-256(public_key).
//! Base32 alphabet: `13456789abcdefghijkmnopqrstuwxyz` (no 0/2/l/v).

use poc_types::{Address, PublicKey};

const BASE32_ALPHABET: &[u8; 32] = b"13456789abcdefghijkmnopqrstuwxyz";

/// ASCII byte → 5-bit value (0xFF = invalid).
const BASE32_DECODE: [u8; 128] = {
    let mut table = [0xFFu8; 128];
    let mut i = 0;
    while i < 32 {
        table[BASE32_ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// 256 bits → ceil(256/5) = 52 characters.
const PUBKEY_CHARS: usize = 52;
/// 40 bits → 8 characters.
const CHECKSUM_CHARS: usize = 8;
const CHECKSUM_BYTES: usize = 5;

fn encode_base32(bytes: &[u8]) -> String {
    let mut result = String::with_capacity((bytes.len() * 8).div_ceil(5));
    let mut buffer: u64 = 0;
    let mut bits = 0;

    for &byte in bytes {
        buffer = (buffer << 8) | byte as u64;
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            result.push(BASE32_ALPHABET[((buffer >> bits) & 0x1F) as usize] as char);
        }
    }
    if bits > 0 {
        result.push(BASE32_ALPHABET[((buffer << (5 - bits)) & 0x1F) as usize] as char);
    }
    result
}

fn decode_base32_fixed<const N: usize>(s: &str) -> Option<[u8; N]> {
    let mut buffer: u64 = 0;
    let mut bits = 0;
    let mut result = [0u8; N];
    let mut pos = 0;

    for c in s.bytes() {
        let val = *BASE32_DECODE.get(c as usize)?;
        if val == 0xFF {
            return None;
        }
        buffer = (buffer << 5) | val as u64;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            if pos < N {
                result[pos] = (buffer >> bits) as u8;
                pos += 1;
            }
        }
    }

    (pos == N).then_some(result)
}

fn checksum(public_key: &[u8; 32]) -> [u8; CHECKSUM_BYTES] {
    let hash = crate::blake2b_256(public_key);
    let mut out = [0u8; CHECKSUM_BYTES];
    out.copy_from_slice(&hash[..CHECKSUM_BYTES]);
    out
}

/// Derive the `poc_` address owned by a public key.
pub fn derive_address(public_key: &PublicKey) -> Address {
    let encoded = format!(
        "{}{}{}",
        Address::PREFIX,
        encode_base32(public_key.as_bytes()),
        encode_base32(&checksum(public_key.as_bytes()))
    );
    // The prefix and a non-empty body are always present.
    Address::parse(encoded).expect("derived address carries the poc_ prefix")
}

/// Extract the public key bytes from an address, checking its checksum.
pub fn decode_address(address: &str) -> Option<[u8; 32]> {
    let encoded = address.strip_prefix(Address::PREFIX)?;
    if encoded.len() != PUBKEY_CHARS + CHECKSUM_CHARS {
        return None;
    }
    let (pubkey_part, checksum_part) = encoded.split_at(PUBKEY_CHARS);
    let pubkey: [u8; 32] = decode_base32_fixed(pubkey_part)?;
    let sum: [u8; CHECKSUM_BYTES] = decode_base32_fixed(checksum_part)?;
    (sum == checksum(&pubkey)).then_some(pubkey)
}

/// Whether an address string is well-formed with a correct checksum.
pub fn validate_address(address: &str) -> bool {
    decode_address(address).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{generate_keypair, keypair_from_seed};

    #[test]
    fn derive_and_validate() {
        let kp = generate_keypair();
        let addr = derive_address(&kp.public);
        assert!(addr.as_str().starts_with("poc_"));
        assert_eq!(addr.as_str().len(), 64);
        assert!(validate_address(addr.as_str()));
    }

    #[test]
    fn derive_is_deterministic() {
        let kp = keypair_from_seed(&[7u8; 32]);
        assert_eq!(derive_address(&kp.public), derive_address(&kp.public));
    }

    #[test]
    fn decode_roundtrip() {
        let kp = generate_keypair();
        let addr = derive_address(&kp.public);
        assert_eq!(decode_address(addr.as_str()), Some(*kp.public.as_bytes()));
    }

    #[test]
    fn invalid_checksum_rejected() {
        let kp = generate_keypair();
        let mut bad = derive_address(&kp.public).to_string();
        let last = bad.pop().unwrap();
        bad.push(if last == '1' { '3' } else { '1' });
        assert!(!validate_address(&bad));
    }

    #[test]
    fn wrong_length_or_prefix_rejected() {
        assert!(!validate_address("poc_tooshort"));
        assert!(!validate_address("poc_"));
        assert!(!validate_address("brst_1111"));
    }

    #[test]
    fn base32_roundtrip() {
        let data = [0xDE, 0xAD, 0xBE, 0xEF, 0x42];
        let decoded: [u8; 5] = decode_base32_fixed(&encode_base32(&data)).unwrap();
        assert_eq!(decoded, data);
    }
}
