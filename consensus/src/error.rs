use poc_ledger::LedgerError;
use poc_protocol::CodecError;
use poc_types::{Address, Na, TxHash};
use poc_wallet_core::WalletError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsensusError {
    #[error("account not found: {0}")]
    AccountNotFound(Address),

    #[error("invalid password")]
    InvalidPassword,

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: Na, available: Na },

    #[error("transaction not found: {0}")]
    TransactionNotFound(TxHash),

    /// The canonical encoding could not be produced. Indicates an encoder defect.
    #[error("transaction hash computation failed: {0}")]
    HashComputation(#[source] CodecError),

    #[error("duplicate operation: {0}")]
    DuplicateOperation(String),

    #[error("encoding error: {0}")]
    Io(#[from] CodecError),

    #[error("signing key unavailable: {0}")]
    KeyUnavailable(String),

    #[error(transparent)]
    Ledger(LedgerError),
}

impl ConsensusError {
    /// Failures that point at a bug rather than a bad request.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::HashComputation(_))
    }
}

impl From<LedgerError> for ConsensusError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::InsufficientFunds { needed, available } => {
                Self::InsufficientFunds { needed, available }
            }
            LedgerError::AlreadyUnlocked(lock) => {
                Self::DuplicateOperation(format!("lock {lock} was already released"))
            }
            LedgerError::DuplicateTransaction(hash) => {
                Self::DuplicateOperation(format!("transaction {hash} is already cached"))
            }
            other => Self::Ledger(other),
        }
    }
}

impl From<WalletError> for ConsensusError {
    fn from(e: WalletError) -> Self {
        match e {
            WalletError::InvalidPassword => Self::InvalidPassword,
            WalletError::AccountNotFound(address) => Self::AccountNotFound(address),
            WalletError::KeyUnavailable(reason) => Self::KeyUnavailable(reason),
            other => Self::KeyUnavailable(other.to_string()),
        }
    }
}
