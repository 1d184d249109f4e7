//! Consensus events exchanged between nodes.
//!
//! Every accepted staking transaction is wrapped in a [`ConsensusEvent`] and
//! handed to an [`EventService`], which caches it locally and relays it to peers.

use std::io::Write;
use std::sync::Arc;

use poc_protocol::{varint_len, write_varint, ByteReader, CodecError, WireCodec};
use poc_transactions::{SignedTransaction, TxType};
use serde::Serialize;

/// Version prefix on every encoded event.
pub const EVENT_VERSION: u64 = 1;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", content = "transaction", rename_all = "snake_case")]
pub enum ConsensusEvent {
    RegisterAgent(SignedTransaction),
    JoinConsensus(SignedTransaction),
    ExitConsensus(SignedTransaction),
}

impl ConsensusEvent {
    pub fn from_transaction(tx: SignedTransaction) -> Self {
        match tx.tx_type() {
            TxType::RegisterAgent => Self::RegisterAgent(tx),
            TxType::JoinConsensus => Self::JoinConsensus(tx),
            TxType::ExitConsensus => Self::ExitConsensus(tx),
        }
    }

    pub fn transaction(&self) -> &SignedTransaction {
        match self {
            Self::RegisterAgent(tx) | Self::JoinConsensus(tx) | Self::ExitConsensus(tx) => tx,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::RegisterAgent(_) => "register_agent",
            Self::JoinConsensus(_) => "join_consensus",
            Self::ExitConsensus(_) => "exit_consensus",
        }
    }
}

impl WireCodec for ConsensusEvent {
    fn encoded_len(&self) -> usize {
        varint_len(EVENT_VERSION) + self.transaction().encoded_len()
    }

    fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<(), CodecError> {
        write_varint(out, EVENT_VERSION)?;
        self.transaction().write_to(out)
    }

    fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        let version = reader.read_varint()?;
        if version != EVENT_VERSION {
            return Err(CodecError::InvalidValue {
                field: "event version",
                reason: format!("unsupported version {version}"),
            });
        }
        let tx: SignedTransaction = reader.read()?;
        Ok(Self::from_transaction(tx))
    }
}

/// Publishes events to the rest of the network.
///
/// Fire-and-forget: delivery failures are handled (or retried) by the implementation.
pub trait EventService: Send + Sync {
    fn broadcast_and_cache(&self, event: ConsensusEvent);
}

impl<T: EventService + ?Sized> EventService for Arc<T> {
    fn broadcast_and_cache(&self, event: ConsensusEvent) {
        (**self).broadcast_and_cache(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use poc_crypto::{derive_address, keypair_from_seed, sign_message};
    use poc_transactions::{
        Delegate, JoinConsensusData, LockTransaction, TxData, TxSignature, UnsignedTransaction,
    };
    use poc_types::{Na, Timestamp};

    fn join_tx() -> SignedTransaction {
        let kp = keypair_from_seed(&[3u8; 32]);
        let address = derive_address(&kp.public);
        let lock =
            LockTransaction::new(address.clone(), Na::new(40), Timestamp::new(9), 0).unwrap();
        let data = TxData::JoinConsensus(JoinConsensusData::new(
            address,
            Delegate::new("poc_agent", Na::new(40)),
            lock,
        ));
        let sealed = UnsignedTransaction::new(Timestamp::new(9), Na::new(1), data)
            .seal()
            .unwrap();
        let signature = sign_message(sealed.hash().as_bytes(), &kp.private);
        sealed.into_signed(TxSignature {
            public_key: kp.public,
            signature,
        })
    }

    #[test]
    fn event_variant_follows_tx_type() {
        let event = ConsensusEvent::from_transaction(join_tx());
        assert!(matches!(event, ConsensusEvent::JoinConsensus(_)));
        assert_eq!(event.name(), "join_consensus");
    }

    #[test]
    fn event_roundtrip() {
        let event = ConsensusEvent::from_transaction(join_tx());
        let bytes = event.to_bytes().unwrap();
        assert_eq!(bytes[0], EVENT_VERSION as u8);
        let decoded = ConsensusEvent::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.transaction().hash(), event.transaction().hash());
    }

    #[test]
    fn unknown_version_rejected() {
        let mut bytes = ConsensusEvent::from_transaction(join_tx()).to_bytes().unwrap();
        bytes[0] = 7;
        assert!(matches!(
            ConsensusEvent::from_bytes(&bytes),
            Err(CodecError::InvalidValue { field: "event version", .. })
        ));
    }
}
