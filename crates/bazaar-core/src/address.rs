//! Payment addresses.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A blockchain address with a canonical string encoding.
///
/// The encoding is what the store compares against the derived payment
/// address of each sale, so implementations must return exactly the string
/// a contract would carry.
pub trait Address {
    fn encode_address(&self) -> String;
}

/// An already-encoded address string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentAddress(String);

impl PaymentAddress {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }
}

impl Address for PaymentAddress {
    fn encode_address(&self) -> String {
        self.0.clone()
    }
}

impl Address for String {
    fn encode_address(&self) -> String {
        self.clone()
    }
}

impl fmt::Display for PaymentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PaymentAddress {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for PaymentAddress {
    fn from(s: String) -> Self {
        Self(s)
    }
}
