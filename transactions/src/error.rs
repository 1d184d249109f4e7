use poc_protocol::CodecError;
use poc_types::{Address, Na};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("invalid signature on transaction {tx_hash}")]
    InvalidSignature { tx_hash: String },

    #[error("deposit must be positive")]
    ZeroDeposit,

    #[error("deposit {deposit} is below the minimum of {minimum}")]
    DepositBelowMinimum { deposit: Na, minimum: Na },

    #[error("commission rate {0} is outside [0, 1]")]
    InvalidCommissionRate(f64),

    #[error("delegate address must not be empty")]
    EmptyDelegateAddress,

    #[error("introduction is {len} bytes, maximum is {max}")]
    IntroductionTooLong { len: usize, max: usize },

    #[error("declared deposit {declared} does not match sub-transaction amount {locked}")]
    AmountMismatch { declared: Na, locked: Na },

    #[error("transaction owner {owner} does not match {found}")]
    OwnerMismatch { owner: Address, found: Address },

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error(transparent)]
    Codec(#[from] CodecError),
}
