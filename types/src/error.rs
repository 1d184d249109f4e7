//! Parse errors for the fundamental types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("amount overflows u64 Na")]
    AmountOverflow,

    #[error("invalid address: {0}")]
    InvalidAddress(String),
}
