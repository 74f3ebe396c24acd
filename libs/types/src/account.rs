//! Actor/account identities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of an account or actor (trader, reserve, network, issuer).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for AccountId {
    fn from(name: String) -> Self {
        Self(name)
    }
}
