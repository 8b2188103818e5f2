//! Persistent item data
//!
//! The small tagged key-value block attached to every item instance.
//! It travels with the item through storage and the wire.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::key::NamespacedKey;

/// Ordered tag block; ordering keeps serialization byte-stable
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersistentData {
    tags: BTreeMap<NamespacedKey, String>,
}

impl PersistentData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a tag value
    pub fn get(&self, key: &NamespacedKey) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Write a tag value, returning the previous one
    pub fn set(&mut self, key: NamespacedKey, value: impl Into<String>) -> Option<String> {
        self.tags.insert(key, value.into())
    }

    /// Remove a tag, returning its value if it was present
    pub fn remove(&mut self, key: &NamespacedKey) -> Option<String> {
        self.tags.remove(key)
    }

    pub fn contains(&self, key: &NamespacedKey) -> bool {
        self.tags.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterate tags in key order
    pub fn iter(&self) -> impl Iterator<Item = (&NamespacedKey, &str)> {
        self.tags.iter().map(|(k, v)| (k, v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> NamespacedKey {
        NamespacedKey::itemstats(name).unwrap()
    }

    #[test]
    fn test_set_overwrites() {
        let mut data = PersistentData::new();
        assert_eq!(data.set(key("kills"), "1"), None);
        assert_eq!(data.set(key("kills"), "2"), Some("1".to_string()));
        assert_eq!(data.get(&key("kills")), Some("2"));
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut data = PersistentData::new();
        data.set(key("kills"), "1");
        assert!(data.contains(&key("kills")));
        assert_eq!(data.remove(&key("kills")), Some("1".to_string()));
        assert!(data.is_empty());
        assert_eq!(data.remove(&key("kills")), None);
    }

    #[test]
    fn test_serialization_is_order_stable() {
        let mut a = PersistentData::new();
        a.set(key("b"), "2");
        a.set(key("a"), "1");

        let mut b = PersistentData::new();
        b.set(key("a"), "1");
        b.set(key("b"), "2");

        assert_eq!(serde_json::to_vec(&a).unwrap(), serde_json::to_vec(&b).unwrap());
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            r#"{"itemstats:a":"1","itemstats:b":"2"}"#
        );
    }
}
