//! Consensus accounts: an address bound to its role payload.

use std::io::Write;

use poc_protocol::{
    string_len, varint_len, write_string, write_varint, ByteReader, CodecError, WireCodec,
};
use poc_types::{Address, Na};
use serde::{Deserialize, Serialize};

use crate::agent::Agent;

/// Stake delegated to an agent.
///
/// Wire order mirrors [`Agent`]: deposit first, then the agent address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegate {
    /// Address of the agent receiving the stake.
    pub delegate_address: String,
    pub deposit: Na,
}

impl Delegate {
    pub fn new(delegate_address: impl Into<String>, deposit: Na) -> Self {
        Self {
            delegate_address: delegate_address.into(),
            deposit,
        }
    }
}

impl WireCodec for Delegate {
    fn encoded_len(&self) -> usize {
        self.deposit.encoded_len() + string_len(&self.delegate_address)
    }

    fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<(), CodecError> {
        self.deposit.write_to(out)?;
        write_string(out, &self.delegate_address)
    }

    fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        let deposit = reader.read()?;
        let delegate_address = reader.read_string()?;
        Ok(Self {
            delegate_address,
            deposit,
        })
    }
}

/// Role payload carried by a [`ConsensusAccount`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum ConsensusExtend {
    Agent(Agent),
    Delegate(Delegate),
}

impl ConsensusExtend {
    const TAG_AGENT: u64 = 1;
    const TAG_DELEGATE: u64 = 2;

    fn tag(&self) -> u64 {
        match self {
            Self::Agent(_) => Self::TAG_AGENT,
            Self::Delegate(_) => Self::TAG_DELEGATE,
        }
    }

    pub fn deposit(&self) -> Na {
        match self {
            Self::Agent(agent) => agent.deposit,
            Self::Delegate(delegate) => delegate.deposit,
        }
    }

    /// The agent this payload is about: the agent itself or the delegation target.
    pub fn agent_address(&self) -> &str {
        match self {
            Self::Agent(agent) => &agent.delegate_address,
            Self::Delegate(delegate) => &delegate.delegate_address,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsensusAccount {
    pub address: Address,
    pub extend: ConsensusExtend,
}

impl ConsensusAccount {
    pub fn agent(address: Address, agent: Agent) -> Self {
        Self {
            address,
            extend: ConsensusExtend::Agent(agent),
        }
    }

    pub fn delegate(address: Address, delegate: Delegate) -> Self {
        Self {
            address,
            extend: ConsensusExtend::Delegate(delegate),
        }
    }

    pub fn as_delegate(&self) -> Option<&Delegate> {
        match &self.extend {
            ConsensusExtend::Delegate(delegate) => Some(delegate),
            ConsensusExtend::Agent(_) => None,
        }
    }

    pub fn as_agent(&self) -> Option<&Agent> {
        match &self.extend {
            ConsensusExtend::Agent(agent) => Some(agent),
            ConsensusExtend::Delegate(_) => None,
        }
    }
}

impl WireCodec for ConsensusAccount {
    fn encoded_len(&self) -> usize {
        let extend_len = match &self.extend {
            ConsensusExtend::Agent(agent) => agent.encoded_len(),
            ConsensusExtend::Delegate(delegate) => delegate.encoded_len(),
        };
        self.address.encoded_len() + varint_len(self.extend.tag()) + extend_len
    }

    fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<(), CodecError> {
        self.address.write_to(out)?;
        write_varint(out, self.extend.tag())?;
        match &self.extend {
            ConsensusExtend::Agent(agent) => agent.write_to(out),
            ConsensusExtend::Delegate(delegate) => delegate.write_to(out),
        }
    }

    fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        let address = reader.read()?;
        let extend = match reader.read_varint()? {
            ConsensusExtend::TAG_AGENT => ConsensusExtend::Agent(reader.read()?),
            ConsensusExtend::TAG_DELEGATE => ConsensusExtend::Delegate(reader.read()?),
            tag => {
                return Err(CodecError::UnknownTag {
                    kind: "consensus extend",
                    tag,
                })
            }
        };
        Ok(Self { address, extend })
    }
}
