//! Stat definitions
//!
//! A stat is a named computation with a stable key. Its key never changes.
//! A `Stat` value pairs that identity with one configuration; a reload builds
//! the next value from the same identity and the registry publishes it.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::config::{ConfigError, StatDef, StatKind, NAME_PLACEHOLDER, VALUE_PLACEHOLDER};
use crate::items::{ItemStack, Material, NamespacedKey};
use super::format::colorize;
use super::kinds::ConfiguredComputation;

/// Errors raised by stat updates and computations
#[derive(Debug, Error)]
pub enum StatError {
    #[error("stat {key} has a malformed counter value {value:?}")]
    MalformedCounter { key: NamespacedKey, value: String },
    #[error("cannot record {amount} for stat {key}")]
    InvalidAmount { key: NamespacedKey, amount: f64 },
    #[error("adding {amount} to stat {key} overflows its counter")]
    CounterOverflow { key: NamespacedKey, amount: f64 },
    #[error("no definition for stat {0} in the reloaded config")]
    MissingDefinition(NamespacedKey),
    #[error("definition {id:?} does not belong to stat {key}")]
    KeyMismatch { key: NamespacedKey, id: String },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Lines a stat contributes to an item's description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFragment {
    lines: Vec<String>,
}

impl DisplayFragment {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn single(line: impl Into<String>) -> Self {
        Self { lines: vec![line.into()] }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Runtime configuration of a stat, replaced wholesale on reload
#[derive(Debug, Clone, PartialEq)]
pub struct StatConfig {
    /// Human readable name used for lookups and `%name%`
    pub name: String,
    /// Display template
    pub format: String,
    pub kind: StatKind,
    /// Material patterns (empty = all)
    pub applies_to: Vec<String>,
}

impl StatConfig {
    pub fn from_def(def: &StatDef) -> Self {
        Self {
            name: def.name.clone(),
            format: def.format.clone(),
            kind: def.kind,
            applies_to: def.applies_to.clone(),
        }
    }

    /// Whether this stat is shown for the given material
    pub fn applies_to(&self, material: &Material) -> bool {
        self.applies_to.is_empty() || self.applies_to.iter().any(|p| material.matches(p))
    }

    /// Fill the template and translate colour codes
    pub fn render(&self, value: &str) -> String {
        let line = self
            .format
            .replace(NAME_PLACEHOLDER, &self.name)
            .replace(VALUE_PLACEHOLDER, value);
        colorize(&line)
    }
}

/// The capability a stat uses to derive its display fragment
///
/// Implementations must be read-only with respect to the item.
pub trait StatComputation: Send + Sync {
    fn compute(
        &self,
        key: &NamespacedKey,
        config: &StatConfig,
        item: &ItemStack,
    ) -> Result<Option<DisplayFragment>, StatError>;
}

impl<F> StatComputation for F
where
    F: Fn(&NamespacedKey, &StatConfig, &ItemStack) -> Result<Option<DisplayFragment>, StatError>
        + Send
        + Sync,
{
    fn compute(
        &self,
        key: &NamespacedKey,
        config: &StatConfig,
        item: &ItemStack,
    ) -> Result<Option<DisplayFragment>, StatError> {
        self(key, config, item)
    }
}

/// The part of a stat that survives reloads
struct Identity {
    key: NamespacedKey,
    computation: Arc<dyn StatComputation>,
    /// Created from the config file (and so managed by reloads)
    configured: bool,
}

/// A single registered stat under one configuration
#[derive(Clone)]
pub struct Stat {
    identity: Arc<Identity>,
    config: Arc<StatConfig>,
}

impl Stat {
    /// Build a stat from its config definition
    pub fn from_def(def: &StatDef) -> Result<Self, ConfigError> {
        let key = def.validate()?;
        Ok(Self {
            identity: Arc::new(Identity {
                key,
                computation: Arc::new(ConfiguredComputation),
                configured: true,
            }),
            config: Arc::new(StatConfig::from_def(def)),
        })
    }

    /// Build a stat backed by host-provided code; reloads leave it alone
    pub fn with_computation(
        key: NamespacedKey,
        config: StatConfig,
        computation: Arc<dyn StatComputation>,
    ) -> Self {
        Self {
            identity: Arc::new(Identity {
                key,
                computation,
                configured: false,
            }),
            config: Arc::new(config),
        }
    }

    pub fn key(&self) -> &NamespacedKey {
        &self.identity.key
    }

    pub fn config(&self) -> &StatConfig {
        &self.config
    }

    /// Human readable name
    pub fn config_name(&self) -> String {
        self.config.name.clone()
    }

    pub fn is_configured(&self) -> bool {
        self.identity.configured
    }

    /// Whether both values are the same stat, whatever their configuration
    pub fn same_stat(&self, other: &Stat) -> bool {
        Arc::ptr_eq(&self.identity, &other.identity)
    }

    /// Re-read this stat's configuration from a definition
    ///
    /// Returns the same stat under the new configuration. `self` is left as
    /// it was, so readers holding it keep a consistent view until the
    /// registry publishes the result.
    pub fn update(&self, def: &StatDef) -> Result<Stat, StatError> {
        let key = def.validate()?;
        if &key != self.key() {
            return Err(StatError::KeyMismatch {
                key: self.key().clone(),
                id: def.id.clone(),
            });
        }
        Ok(Self {
            identity: Arc::clone(&self.identity),
            config: Arc::new(StatConfig::from_def(def)),
        })
    }

    /// Compute the fragment for an item against this configuration
    pub fn compute(&self, item: &ItemStack) -> Result<Option<DisplayFragment>, StatError> {
        self.identity.computation.compute(self.key(), &self.config, item)
    }
}

impl fmt::Debug for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stat")
            .field("key", self.key())
            .field("config", &*self.config)
            .field("configured", &self.is_configured())
            .finish()
    }
}
