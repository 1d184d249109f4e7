//! Account collaborator for the consensus core.
//!
//! - [`AccountService`]: lookup, password validation and hash signing
//! - [`KeystoreAccounts`]: the file-backed implementation used by the node
//! - [`keystore`]: Argon2id + AES-256-GCM encryption of Ed25519 secret keys

pub mod account;
pub mod accounts;
pub mod error;
pub mod keystore;

pub use account::{Account, AccountService};
pub use accounts::KeystoreAccounts;
pub use error::WalletError;
pub use keystore::{
    decrypt_keystore, encrypt_keystore, load_keystore, save_keystore, KdfParams, KeystoreFile,
};
