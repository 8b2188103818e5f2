//! Stat definitions for data-driven configuration
//!
//! These definitions are loaded from RON files and describe every stat the
//! registry should hold.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::items::{KeyParseError, NamespacedKey};
use crate::selection::ACTIVE_STAT_TAG;

/// Placeholder replaced by the computed value
pub const VALUE_PLACEHOLDER: &str = "%value%";
/// Placeholder replaced by the stat's config name
pub const NAME_PLACEHOLDER: &str = "%name%";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),
    #[error("invalid stat id {id:?}: {source}")]
    InvalidId {
        id: String,
        #[source]
        source: KeyParseError,
    },
    #[error("stat id {0:?} is reserved")]
    ReservedId(String),
    #[error("stat id {0:?} is defined more than once")]
    DuplicateId(String),
    #[error("stats {first:?} and {second:?} share the name {name:?}")]
    DuplicateName {
        name: String,
        first: String,
        second: String,
    },
    #[error("stat {0:?} has an empty name")]
    EmptyName(String),
    #[error("format of stat {0:?} has no %value% placeholder")]
    MissingPlaceholder(String),
}

/// How a stat derives its value from an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKind {
    /// Tracked counter stored on the item under the stat's key
    Counter,
    /// Remaining durability
    Durability,
    /// Number of enchantments
    Enchantments,
}

/// A single stat as written in the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatDef {
    /// Key name, becomes `itemstats:<id>`
    pub id: String,
    /// Human readable name, matched case-insensitively
    pub name: String,
    /// Display template with `&` colour codes
    pub format: String,
    pub kind: StatKind,
    /// Material patterns this stat applies to (empty = all)
    #[serde(default)]
    pub applies_to: Vec<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl StatDef {
    pub fn new(id: &str, name: &str, format: &str, kind: StatKind) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            format: format.to_string(),
            kind,
            applies_to: Vec::new(),
            enabled: true,
        }
    }

    /// Builder-style material filter
    pub fn applies_to<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.applies_to = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Key this definition registers under
    pub fn key(&self) -> Result<NamespacedKey, ConfigError> {
        if self.id == ACTIVE_STAT_TAG {
            return Err(ConfigError::ReservedId(self.id.clone()));
        }
        NamespacedKey::itemstats(&self.id).map_err(|source| ConfigError::InvalidId {
            id: self.id.clone(),
            source,
        })
    }

    /// Check a single definition in isolation
    pub fn validate(&self) -> Result<NamespacedKey, ConfigError> {
        let key = self.key()?;
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName(self.id.clone()));
        }
        if !self.format.contains(VALUE_PLACEHOLDER) {
            return Err(ConfigError::MissingPlaceholder(self.id.clone()));
        }
        Ok(key)
    }
}

/// The whole stats file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsConfig {
    pub stats: Vec<StatDef>,
}

impl StatsConfig {
    /// Find a definition by id
    pub fn find(&self, id: &str) -> Option<&StatDef> {
        self.stats.iter().find(|s| s.id == id)
    }

    /// Definitions that should be registered
    pub fn enabled(&self) -> impl Iterator<Item = &StatDef> {
        self.stats.iter().filter(|s| s.enabled)
    }

    /// Reject configurations that would make lookups ambiguous
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut ids = HashSet::new();
        for def in &self.stats {
            if !ids.insert(def.id.as_str()) {
                return Err(ConfigError::DuplicateId(def.id.clone()));
            }
        }

        let mut names: HashMap<String, &str> = HashMap::new();
        for def in self.enabled() {
            def.validate()?;
            if let Some(first) = names.insert(def.name.trim().to_lowercase(), &def.id) {
                return Err(ConfigError::DuplicateName {
                    name: def.name.clone(),
                    first: first.to_string(),
                    second: def.id.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Create default stat definitions (hardcoded fallback)
pub fn default_stats_config() -> StatsConfig {
    const WEAPONS: [&str; 5] = ["*_SWORD", "*_AXE", "BOW", "CROSSBOW", "TRIDENT"];
    const TOOLS: [&str; 4] = ["*_PICKAXE", "*_SHOVEL", "*_AXE", "*_HOE"];

    StatsConfig {
        stats: vec![
            StatDef::new("damage_dealt", "Damage", "&8» &7Damage Dealt: &f%value%", StatKind::Counter)
                .applies_to(WEAPONS),
            StatDef::new("kills", "Kills", "&8» &7Kills: &f%value%", StatKind::Counter)
                .applies_to(WEAPONS),
            StatDef::new("blocks_broken", "Blocks", "&8» &7Blocks Broken: &f%value%", StatKind::Counter)
                .applies_to(TOOLS),
            StatDef::new("durability", "Durability", "&8» &7%name%: &a%value%", StatKind::Durability),
            StatDef::new("enchantments", "Enchantments", "&8» &7%name%: &d%value%", StatKind::Enchantments),
        ],
    }
}
