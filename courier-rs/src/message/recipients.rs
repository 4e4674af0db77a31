//! Recipient lists
//!
//! The API accepts either a single address or a list of addresses for
//! `to`, `cc` and `bcc`. Both shapes are normalized into [`Recipients`],
//! an ordered collection that keeps the caller's order for display.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Ordered list of recipient addresses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Recipients(Vec<String>);

/// Wire shape accepted at the API boundary
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl Recipients {
    pub fn new(addresses: Vec<String>) -> Self {
        Self(addresses)
    }

    /// A single address
    pub fn single(address: impl Into<String>) -> Self {
        Self(vec![address.into()])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Comma-joined form handed to the mail transport
    pub fn joined(&self) -> String {
        self.0.join(",")
    }
}

impl fmt::Display for Recipients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

impl From<&str> for Recipients {
    fn from(address: &str) -> Self {
        Self::single(address)
    }
}

impl From<String> for Recipients {
    fn from(address: String) -> Self {
        Self::single(address)
    }
}

impl From<Vec<String>> for Recipients {
    fn from(addresses: Vec<String>) -> Self {
        Self::new(addresses)
    }
}

impl From<Vec<&str>> for Recipients {
    fn from(addresses: Vec<&str>) -> Self {
        Self::new(addresses.into_iter().map(str::to_string).collect())
    }
}

impl<'de> Deserialize<'de> for Recipients {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match OneOrMany::deserialize(deserializer)? {
            OneOrMany::One(address) => Self::single(address),
            OneOrMany::Many(addresses) => Self::new(addresses),
        })
    }
}
