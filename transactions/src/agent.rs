//! Agent registration record.

use std::io::Write;

use poc_protocol::{string_len, write_f64, write_string, ByteReader, CodecError, WireCodec, F64_LEN};
use poc_types::{Na, Timestamp};
use serde::{Deserialize, Serialize};

/// Where an agent currently sits in the round schedule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentStatus {
    #[default]
    Waiting,
    Packing,
}

/// Local runtime state maintained by the round scheduler.
///
/// Never encoded: two nodes may disagree on it without disagreeing on hashes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    pub status: AgentStatus,
    pub round_no: u64,
    pub round_index: u64,
    pub round_start_time: Option<Timestamp>,
    pub round_end_time: Option<Timestamp>,
}

/// A candidate block producer's registration.
///
/// Wire order: deposit, delegate address, commission rate, introduction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Agent {
    pub deposit: Na,
    /// Address the agent produces blocks under.
    pub delegate_address: String,
    /// Fraction of rewards kept from delegators, in `[0, 1]`.
    pub commission_rate: f64,
    pub introduction: String,
    #[serde(skip)]
    pub round: RoundState,
}

impl Agent {
    pub fn new(
        deposit: Na,
        delegate_address: impl Into<String>,
        commission_rate: f64,
        introduction: impl Into<String>,
    ) -> Self {
        Self {
            deposit,
            delegate_address: delegate_address.into(),
            commission_rate,
            introduction: introduction.into(),
            round: RoundState::default(),
        }
    }
}

/// Equality over the encoded fields only.
impl PartialEq for Agent {
    fn eq(&self, other: &Self) -> bool {
        self.deposit == other.deposit
            && self.delegate_address == other.delegate_address
            && self.commission_rate.to_bits() == other.commission_rate.to_bits()
            && self.introduction == other.introduction
    }
}

impl WireCodec for Agent {
    fn encoded_len(&self) -> usize {
        self.deposit.encoded_len()
            + string_len(&self.delegate_address)
            + F64_LEN
            + string_len(&self.introduction)
    }

    fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<(), CodecError> {
        self.deposit.write_to(out)?;
        write_string(out, &self.delegate_address)?;
        write_f64(out, self.commission_rate)?;
        write_string(out, &self.introduction)
    }

    fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            deposit: reader.read()?,
            delegate_address: reader.read_string()?,
            commission_rate: reader.read_f64()?,
            introduction: reader.read_string()?,
            round: RoundState::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Agent {
        Agent::new(Na::new(1000), "poc_a", 0.1, "hi")
    }

    #[test]
    fn golden_encoding() {
        let bytes = sample().to_bytes().unwrap();
        let expected: Vec<u8> = [
            &[0xfd, 0xe8, 0x03][..],
            &[0x05, b'p', b'o', b'c', b'_', b'a'],
            &[0x9a, 0x99, 0x99, 0x99, 0x99, 0x99, 0xb9, 0x3f],
            &[0x02, b'h', b'i'],
        ]
        .concat();
        assert_eq!(bytes, expected);
        assert_eq!(sample().encoded_len(), 20);
    }

    #[test]
    fn round_state_is_not_encoded() {
        let mut agent = sample();
        let plain = agent.to_bytes().unwrap();
        agent.round = RoundState {
            status: AgentStatus::Packing,
            round_no: 42,
            round_index: 3,
            round_start_time: Some(Timestamp::new(100)),
            round_end_time: Some(Timestamp::new(110)),
        };
        assert_eq!(agent.to_bytes().unwrap(), plain);

        let decoded = Agent::from_bytes(&plain).unwrap();
        assert_eq!(decoded.round, RoundState::default());
        assert_eq!(decoded, agent);
    }

    #[test]
    fn truncated_input_is_malformed() {
        let bytes = sample().to_bytes().unwrap();
        let err = Agent::from_bytes(&bytes[..bytes.len() - 1]).unwrap_err();
        assert!(err.is_malformed());
    }
}
