//! Account address type with `poc_` prefix.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypesError;

/// An account address, always prefixed with `poc_`.
///
/// Derived from the account's public key via Blake2b hashing + base32 encoding
/// (see `poc_crypto::derive_address`). This type only enforces the prefix;
/// checksum validation lives in the crypto crate.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// The standard prefix for all account addresses.
    pub const PREFIX: &'static str = "poc_";

    /// Create an address from a raw string.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TypesError> {
        let s = raw.into();
        if s.starts_with(Self::PREFIX) && s.len() > Self::PREFIX.len() {
            Ok(Self(s))
        } else {
            Err(TypesError::InvalidAddress(s))
        }
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Address {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_requires_prefix() {
        assert!(Address::parse("poc_abc").is_ok());
        assert!(Address::parse("poc_").is_err());
        assert!(Address::parse("brst_abc").is_err());
    }
}
