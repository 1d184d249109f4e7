//! Fund-lock and fund-unlock sub-transactions issued by the ledger.
//!
//! Each carries a hash over its own encoding. The hash is recomputed whenever
//! a value is built or decoded and never travels on the wire.

use std::io::Write;

use poc_crypto::hash_transaction;
use poc_protocol::{ByteReader, CodecError, WireCodec};
use poc_types::{Address, Na, Timestamp, TxHash};
use serde::Serialize;

fn digest<T: WireCodec>(value: &T) -> Result<TxHash, CodecError> {
    Ok(hash_transaction(&value.to_bytes()?))
}

/// Reserves `amount` of `address`'s balance as collateral.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LockTransaction {
    address: Address,
    amount: Na,
    time: Timestamp,
    nonce: u64,
    #[serde(skip)]
    hash: TxHash,
}

impl LockTransaction {
    /// `nonce` distinguishes locks of the same amount issued in the same second.
    pub fn new(
        address: Address,
        amount: Na,
        time: Timestamp,
        nonce: u64,
    ) -> Result<Self, CodecError> {
        let mut lock = Self {
            address,
            amount,
            time,
            nonce,
            hash: TxHash::ZERO,
        };
        lock.hash = digest(&lock)?;
        Ok(lock)
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn amount(&self) -> Na {
        self.amount
    }

    pub fn time(&self) -> Timestamp {
        self.time
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn hash(&self) -> &TxHash {
        &self.hash
    }
}

impl WireCodec for LockTransaction {
    fn encoded_len(&self) -> usize {
        self.address.encoded_len()
            + self.amount.encoded_len()
            + self.time.encoded_len()
            + self.nonce.encoded_len()
    }

    fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<(), CodecError> {
        self.address.write_to(out)?;
        self.amount.write_to(out)?;
        self.time.write_to(out)?;
        self.nonce.write_to(out)
    }

    fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        let address = reader.read()?;
        let amount = reader.read()?;
        let time = reader.read()?;
        let nonce = reader.read()?;
        Self::new(address, amount, time, nonce)
    }
}

/// Releases the funds held by a prior [`LockTransaction`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UnlockTransaction {
    lock_hash: TxHash,
    address: Address,
    amount: Na,
    time: Timestamp,
    #[serde(skip)]
    hash: TxHash,
}

impl UnlockTransaction {
    /// Build the unlock for `lock`; address and amount are copied from it.
    pub fn for_lock(lock: &LockTransaction, time: Timestamp) -> Result<Self, CodecError> {
        Self::from_parts(*lock.hash(), lock.address.clone(), lock.amount, time)
    }

    fn from_parts(
        lock_hash: TxHash,
        address: Address,
        amount: Na,
        time: Timestamp,
    ) -> Result<Self, CodecError> {
        let mut unlock = Self {
            lock_hash,
            address,
            amount,
            time,
            hash: TxHash::ZERO,
        };
        unlock.hash = digest(&unlock)?;
        Ok(unlock)
    }

    pub fn lock_hash(&self) -> &TxHash {
        &self.lock_hash
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn amount(&self) -> Na {
        self.amount
    }

    pub fn time(&self) -> Timestamp {
        self.time
    }

    pub fn hash(&self) -> &TxHash {
        &self.hash
    }
}

impl WireCodec for UnlockTransaction {
    fn encoded_len(&self) -> usize {
        self.lock_hash.encoded_len()
            + self.address.encoded_len()
            + self.amount.encoded_len()
            + self.time.encoded_len()
    }

    fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<(), CodecError> {
        self.lock_hash.write_to(out)?;
        self.address.write_to(out)?;
        self.amount.write_to(out)?;
        self.time.write_to(out)
    }

    fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        let lock_hash = reader.read()?;
        let address = reader.read()?;
        let amount = reader.read()?;
        let time = reader.read()?;
        Self::from_parts(lock_hash, address, amount, time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lock(nonce: u64) -> LockTransaction {
        LockTransaction::new(
            Address::parse("poc_owner").unwrap(),
            Na::new(2_000),
            Timestamp::new(1_700_000_000),
            nonce,
        )
        .unwrap()
    }

    #[test]
    fn decode_recomputes_hash() {
        let original = lock(1);
        let decoded = LockTransaction::from_bytes(&original.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded.hash(), original.hash());
        assert!(!decoded.hash().is_zero());
    }

    #[test]
    fn nonce_changes_hash() {
        assert_ne!(lock(1).hash(), lock(2).hash());
    }

    #[test]
    fn unlock_copies_lock_fields() {
        let lock = lock(3);
        let unlock = UnlockTransaction::for_lock(&lock, Timestamp::new(1_700_000_500)).unwrap();
        assert_eq!(unlock.lock_hash(), lock.hash());
        assert_eq!(unlock.address(), lock.address());
        assert_eq!(unlock.amount(), lock.amount());

        let decoded = UnlockTransaction::from_bytes(&unlock.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, unlock);
    }
}
