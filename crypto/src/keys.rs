//! Ed25519 key generation.

use ed25519_dalek::SigningKey;
use poc_types::{KeyPair, PrivateKey, PublicKey};
use rand::rngs::OsRng;

/// Generate a new Ed25519 key pair from the operating system's RNG.
pub fn generate_keypair() -> KeyPair {
    let signing_key = SigningKey::generate(&mut OsRng);
    keypair_from_signing_key(&signing_key)
}

/// Derive the public key from a private key.
pub fn public_from_private(private: &PrivateKey) -> PublicKey {
    let signing_key = SigningKey::from_bytes(&private.0);
    PublicKey(signing_key.verifying_key().to_bytes())
}

/// Reconstruct a full key pair from a private key.
pub fn keypair_from_private(private: PrivateKey) -> KeyPair {
    let public = public_from_private(&private);
    KeyPair { public, private }
}

/// Derive a key pair from a 32-byte seed (deterministic).
pub fn keypair_from_seed(seed: &[u8; 32]) -> KeyPair {
    keypair_from_signing_key(&SigningKey::from_bytes(seed))
}

fn keypair_from_signing_key(signing_key: &SigningKey) -> KeyPair {
    KeyPair {
        public: PublicKey(signing_key.verifying_key().to_bytes()),
        private: PrivateKey(signing_key.to_bytes()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_produces_distinct_keys() {
        let a = generate_keypair();
        let b = generate_keypair();
        assert_ne!(a.public, b.public);
    }

    #[test]
    fn public_from_private_matches_pair() {
        let kp = generate_keypair();
        assert_eq!(public_from_private(&kp.private), kp.public);
    }

    #[test]
    fn keypair_from_seed_deterministic() {
        let kp1 = keypair_from_seed(&[42u8; 32]);
        let kp2 = keypair_from_seed(&[42u8; 32]);
        assert_eq!(kp1.public, kp2.public);
        assert_eq!(kp1.private.0, kp2.private.0);
    }

    #[test]
    fn keypair_from_private_roundtrip() {
        let kp1 = keypair_from_seed(&[3u8; 32]);
        let kp2 = keypair_from_private(PrivateKey(kp1.private.0));
        assert_eq!(kp1.public, kp2.public);
    }
}
