use poc_protocol::CodecError;
use poc_types::{Address, Na, TxHash};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: Na, available: Na },

    #[error("account not found: {0}")]
    AccountNotFound(Address),

    #[error("lock {0} was already released")]
    AlreadyUnlocked(TxHash),

    #[error("lock {0} is still held")]
    LockStillHeld(TxHash),

    #[error("lock {0} not found")]
    LockNotFound(TxHash),

    #[error("transaction {0} is already cached")]
    DuplicateTransaction(TxHash),

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("storage error: {0}")]
    Storage(String),
}
