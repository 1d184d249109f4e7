use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("config error: {0}")]
    Config(String),

    #[error("wallet error: {0}")]
    Wallet(#[from] poc_wallet_core::WalletError),

    #[error("consensus error: {0}")]
    Consensus(#[from] poc_consensus::ConsensusError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
