//! The three staking transactions and their hash-then-sign lifecycle.
//!
//! ```text
//! UnsignedTransaction --seal()--> SealedTransaction --into_signed()--> SignedTransaction
//! ```
//!
//! The hash covers the header and payload only. Once sealed, nothing can
//! mutate the payload, so a signature always covers the bytes it was made for.

use std::io::Write;

use poc_crypto::{derive_address, hash_transaction, verify_signature};
use poc_protocol::{varint_len, write_varint, ByteReader, CodecError, WireCodec};
use poc_types::{Address, Na, PublicKey, Signature, Timestamp, TxHash};
use serde::{Deserialize, Serialize};

use crate::account::{ConsensusAccount, Delegate};
use crate::agent::Agent;
use crate::error::TransactionError;
use crate::lock::{LockTransaction, UnlockTransaction};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxType {
    RegisterAgent,
    JoinConsensus,
    ExitConsensus,
}

impl TxType {
    pub fn code(self) -> u64 {
        match self {
            Self::RegisterAgent => 90,
            Self::JoinConsensus => 91,
            Self::ExitConsensus => 92,
        }
    }

    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            90 => Some(Self::RegisterAgent),
            91 => Some(Self::JoinConsensus),
            92 => Some(Self::ExitConsensus),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegisterAgentData {
    pub address: Address,
    pub agent: Agent,
    pub lock: LockTransaction,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct JoinConsensusData {
    /// Always carries a [`Delegate`] payload; decoding rejects anything else.
    pub account: ConsensusAccount,
    pub lock: LockTransaction,
}

impl JoinConsensusData {
    pub fn new(address: Address, delegate: Delegate, lock: LockTransaction) -> Self {
        Self {
            account: ConsensusAccount::delegate(address, delegate),
            lock,
        }
    }

    pub fn delegate(&self) -> Option<&Delegate> {
        self.account.as_delegate()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExitConsensusData {
    pub address: Address,
    pub join_tx_hash: TxHash,
    pub unlock: UnlockTransaction,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TxData {
    RegisterAgent(RegisterAgentData),
    JoinConsensus(JoinConsensusData),
    ExitConsensus(ExitConsensusData),
}

impl TxData {
    pub fn tx_type(&self) -> TxType {
        match self {
            Self::RegisterAgent(_) => TxType::RegisterAgent,
            Self::JoinConsensus(_) => TxType::JoinConsensus,
            Self::ExitConsensus(_) => TxType::ExitConsensus,
        }
    }

    /// The account that must sign this transaction.
    pub fn owner(&self) -> &Address {
        match self {
            Self::RegisterAgent(data) => &data.address,
            Self::JoinConsensus(data) => &data.account.address,
            Self::ExitConsensus(data) => &data.address,
        }
    }

    /// Stake declared by the payload, if it declares one.
    pub fn declared_deposit(&self) -> Option<Na> {
        match self {
            Self::RegisterAgent(data) => Some(data.agent.deposit),
            Self::JoinConsensus(data) => Some(data.account.extend.deposit()),
            Self::ExitConsensus(_) => None,
        }
    }

    pub fn lock(&self) -> Option<&LockTransaction> {
        match self {
            Self::RegisterAgent(data) => Some(&data.lock),
            Self::JoinConsensus(data) => Some(&data.lock),
            Self::ExitConsensus(_) => None,
        }
    }

    pub fn unlock(&self) -> Option<&UnlockTransaction> {
        match self {
            Self::ExitConsensus(data) => Some(&data.unlock),
            _ => None,
        }
    }

    fn payload_len(&self) -> usize {
        match self {
            Self::RegisterAgent(data) => {
                data.address.encoded_len() + data.agent.encoded_len() + data.lock.encoded_len()
            }
            Self::JoinConsensus(data) => data.account.encoded_len() + data.lock.encoded_len(),
            Self::ExitConsensus(data) => {
                data.address.encoded_len()
                    + data.join_tx_hash.encoded_len()
                    + data.unlock.encoded_len()
            }
        }
    }

    fn write_payload<W: Write + ?Sized>(&self, out: &mut W) -> Result<(), CodecError> {
        match self {
            Self::RegisterAgent(data) => {
                data.address.write_to(out)?;
                data.agent.write_to(out)?;
                data.lock.write_to(out)
            }
            Self::JoinConsensus(data) => {
                data.account.write_to(out)?;
                data.lock.write_to(out)
            }
            Self::ExitConsensus(data) => {
                data.address.write_to(out)?;
                data.join_tx_hash.write_to(out)?;
                data.unlock.write_to(out)
            }
        }
    }

    fn read_payload(tx_type: TxType, reader: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        Ok(match tx_type {
            TxType::RegisterAgent => Self::RegisterAgent(RegisterAgentData {
                address: reader.read()?,
                agent: reader.read()?,
                lock: reader.read()?,
            }),
            TxType::JoinConsensus => {
                let account: ConsensusAccount = reader.read()?;
                if account.as_delegate().is_none() {
                    return Err(CodecError::InvalidValue {
                        field: "join payload",
                        reason: "expected a delegate account".into(),
                    });
                }
                Self::JoinConsensus(JoinConsensusData {
                    account,
                    lock: reader.read()?,
                })
            }
            TxType::ExitConsensus => Self::ExitConsensus(ExitConsensusData {
                address: reader.read()?,
                join_tx_hash: reader.read()?,
                unlock: reader.read()?,
            }),
        })
    }
}

/// A transaction under construction. Fields may change freely until [`seal`](Self::seal).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UnsignedTransaction {
    pub time: Timestamp,
    pub fee: Na,
    pub data: TxData,
}

impl UnsignedTransaction {
    pub fn new(time: Timestamp, fee: Na, data: TxData) -> Self {
        Self { time, fee, data }
    }

    /// Freeze the transaction and compute its hash.
    pub fn seal(self) -> Result<SealedTransaction, CodecError> {
        let hash = hash_transaction(&self.to_bytes()?);
        Ok(SealedTransaction {
            unsigned: self,
            hash,
        })
    }
}

impl WireCodec for UnsignedTransaction {
    fn encoded_len(&self) -> usize {
        varint_len(self.data.tx_type().code())
            + self.time.encoded_len()
            + self.fee.encoded_len()
            + self.data.payload_len()
    }

    fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<(), CodecError> {
        write_varint(out, self.data.tx_type().code())?;
        self.time.write_to(out)?;
        self.fee.write_to(out)?;
        self.data.write_payload(out)
    }

    fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        let code = reader.read_varint()?;
        let tx_type = TxType::from_code(code).ok_or(CodecError::UnknownTag {
            kind: "transaction type",
            tag: code,
        })?;
        let time = reader.read()?;
        let fee = reader.read()?;
        let data = TxData::read_payload(tx_type, reader)?;
        Ok(Self { time, fee, data })
    }
}

/// A hashed transaction waiting for its signature.
#[derive(Clone, Debug)]
pub struct SealedTransaction {
    unsigned: UnsignedTransaction,
    hash: TxHash,
}

impl SealedTransaction {
    pub fn hash(&self) -> &TxHash {
        &self.hash
    }

    pub fn data(&self) -> &TxData {
        &self.unsigned.data
    }

    pub fn into_signed(self, signature: TxSignature) -> SignedTransaction {
        SignedTransaction {
            unsigned: self.unsigned,
            hash: self.hash,
            signature,
        }
    }
}

/// Signer's public key and the Ed25519 signature over the transaction hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxSignature {
    pub public_key: PublicKey,
    pub signature: Signature,
}

impl WireCodec for TxSignature {
    fn encoded_len(&self) -> usize {
        self.public_key.encoded_len() + self.signature.encoded_len()
    }

    fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<(), CodecError> {
        self.public_key.write_to(out)?;
        self.signature.write_to(out)
    }

    fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            public_key: reader.read()?,
            signature: reader.read()?,
        })
    }
}

/// A complete, immutable staking transaction.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SignedTransaction {
    #[serde(flatten)]
    unsigned: UnsignedTransaction,
    hash: TxHash,
    signature: TxSignature,
}

impl SignedTransaction {
    pub fn hash(&self) -> &TxHash {
        &self.hash
    }

    pub fn tx_type(&self) -> TxType {
        self.unsigned.data.tx_type()
    }

    pub fn time(&self) -> Timestamp {
        self.unsigned.time
    }

    pub fn fee(&self) -> Na {
        self.unsigned.fee
    }

    pub fn data(&self) -> &TxData {
        &self.unsigned.data
    }

    pub fn owner(&self) -> &Address {
        self.unsigned.data.owner()
    }

    pub fn signature(&self) -> &TxSignature {
        &self.signature
    }

    /// Check that the signer owns the transaction and signed this hash.
    pub fn verify(&self) -> Result<(), TransactionError> {
        let signer = derive_address(&self.signature.public_key);
        if &signer != self.owner() {
            return Err(TransactionError::OwnerMismatch {
                owner: self.owner().clone(),
                found: signer,
            });
        }
        if !verify_signature(
            self.hash.as_bytes(),
            &self.signature.signature,
            &self.signature.public_key,
        ) {
            return Err(TransactionError::InvalidSignature {
                tx_hash: self.hash.to_string(),
            });
        }
        Ok(())
    }
}

impl WireCodec for SignedTransaction {
    fn encoded_len(&self) -> usize {
        self.unsigned.encoded_len() + self.signature.encoded_len()
    }

    fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<(), CodecError> {
        self.unsigned.write_to(out)?;
        self.signature.write_to(out)
    }

    fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        let sealed = UnsignedTransaction::read_from(reader)?.seal()?;
        let signature = reader.read()?;
        Ok(sealed.into_signed(signature))
    }
}
