use poc_types::Address;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("account not found: {0}")]
    AccountNotFound(Address),

    #[error("invalid password")]
    InvalidPassword,

    #[error("signing key unavailable: {0}")]
    KeyUnavailable(String),

    #[error("key error: {0}")]
    Key(String),

    #[error("keystore I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("keystore JSON: {0}")]
    Json(#[from] serde_json::Error),
}
