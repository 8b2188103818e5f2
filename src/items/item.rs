//! Item definitions
//!
//! Core item stack type as it exists server-side and as it is sent to clients.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::data::PersistentData;

/// Item type name, e.g. `DIAMOND_SWORD`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Material(String);

impl Material {
    pub const AIR: &'static str = "AIR";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into().to_ascii_uppercase())
    }

    pub fn air() -> Self {
        Self(Self::AIR.to_string())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn is_air(&self) -> bool {
        self.0 == Self::AIR
    }

    /// Match against a pattern: exact name, or `*SUFFIX` / `PREFIX*` wildcards
    pub fn matches(&self, pattern: &str) -> bool {
        let pattern = pattern.to_ascii_uppercase();
        if pattern == "*" {
            true
        } else if let Some(suffix) = pattern.strip_prefix('*') {
            self.0.ends_with(suffix)
        } else if let Some(prefix) = pattern.strip_suffix('*') {
            self.0.starts_with(prefix)
        } else {
            self.0 == pattern
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stack of items occupying one inventory slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Item type
    pub material: Material,
    /// Stack size
    pub amount: u8,
    /// Durability used so far
    #[serde(default)]
    pub damage: u32,
    /// Maximum durability (None = not damageable)
    #[serde(default)]
    pub max_damage: Option<u32>,
    /// Enchantment id -> level
    #[serde(default)]
    pub enchantments: BTreeMap<String, u16>,
    /// Persisted tag block
    #[serde(default)]
    pub data: PersistentData,
    /// Description lines shown under the item name
    #[serde(default)]
    pub lore: Vec<String>,
}

impl ItemStack {
    /// Create a single item of the given material
    pub fn new(material: impl Into<String>) -> Self {
        Self {
            material: Material::new(material),
            amount: 1,
            damage: 0,
            max_damage: None,
            enchantments: BTreeMap::new(),
            data: PersistentData::new(),
            lore: Vec::new(),
        }
    }

    /// An empty slot
    pub fn empty() -> Self {
        Self {
            amount: 0,
            ..Self::new(Material::AIR)
        }
    }

    /// Builder-style durability setter
    pub fn with_durability(mut self, damage: u32, max_damage: u32) -> Self {
        self.damage = damage;
        self.max_damage = Some(max_damage);
        self
    }

    /// Builder-style lore setter
    pub fn with_lore<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lore = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Whether this slot holds nothing
    pub fn is_empty(&self) -> bool {
        self.material.is_air() || self.amount == 0
    }

    /// Remaining durability, if the item is damageable
    pub fn durability_left(&self) -> Option<u32> {
        self.max_damage.map(|max| max.saturating_sub(self.damage))
    }

    /// Compare everything except the description
    pub fn same_canonical_state(&self, other: &ItemStack) -> bool {
        self.material == other.material
            && self.amount == other.amount
            && self.damage == other.damage
            && self.max_damage == other.max_damage
            && self.enchantments == other.enchantments
            && self.data == other.data
    }
}

impl Default for ItemStack {
    fn default() -> Self {
        Self::empty()
    }
}
