//! Namespaced keys
//!
//! Two-part `namespace:name` identifiers used for stat keys and item tags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Namespace used for every key this crate creates
pub const DEFAULT_NAMESPACE: &str = "itemstats";

/// Errors produced when parsing a key from text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    #[error("key is empty")]
    Empty,
    #[error("invalid character {ch:?} in key part {part:?}")]
    InvalidCharacter { part: String, ch: char },
    #[error("key {0:?} has more than one ':' separator")]
    TooManySeparators(String),
}

/// Stable identifier made of a namespace and a name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NamespacedKey {
    namespace: String,
    name: String,
}

impl NamespacedKey {
    /// Build a key, validating both parts
    pub fn new(namespace: &str, name: &str) -> Result<Self, KeyParseError> {
        validate_part(namespace)?;
        validate_part(name)?;
        Ok(Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
        })
    }

    /// Build a key from parts known to be valid
    pub(crate) fn from_static(namespace: &'static str, name: &'static str) -> Self {
        debug_assert!(validate_part(namespace).is_ok() && validate_part(name).is_ok());
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }

    /// Build a key in the default namespace
    pub fn itemstats(name: &str) -> Result<Self, KeyParseError> {
        Self::new(DEFAULT_NAMESPACE, name)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

fn validate_part(part: &str) -> Result<(), KeyParseError> {
    if part.is_empty() {
        return Err(KeyParseError::Empty);
    }
    match part
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '-' | '.')))
    {
        Some(ch) => Err(KeyParseError::InvalidCharacter { part: part.to_string(), ch }),
        None => Ok(()),
    }
}

impl fmt::Display for NamespacedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

impl FromStr for NamespacedKey {
    type Err = KeyParseError;

    /// Parses `namespace:name`; a bare `name` lands in the default namespace
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(name), None, _) => Self::itemstats(name),
            (Some(namespace), Some(name), None) => Self::new(namespace, name),
            _ => Err(KeyParseError::TooManySeparators(s.to_string())),
        }
    }
}

// Serialized as the flat `namespace:name` string so tags stay readable on disk
impl Serialize for NamespacedKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NamespacedKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
