//! Stat registry
//!
//! Keyed index of every live [`Stat`], published copy-on-write.
//!
//! Readers load the current index without locking and keep working on that
//! snapshot even if a reload publishes a new one meanwhile. Writers are
//! serialized by a mutex, clone the index, edit the clone and publish it with
//! a single store, so a reader sees either the whole old index or the whole
//! new one. Stats are immutable once published; an updated configuration is
//! a new [`Stat`] value in the next index, so membership and configuration
//! always change together.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;

use crate::config::{ConfigError, StatDef, StatsConfig};
use crate::items::{NamespacedKey, DEFAULT_NAMESPACE};
use super::stat::{Stat, StatError};

/// Published index type
pub type StatIndex = BTreeMap<NamespacedKey, Arc<Stat>>;

/// Outcome of a config reload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReloadSummary {
    pub added: Vec<NamespacedKey>,
    pub removed: Vec<NamespacedKey>,
    pub updated: usize,
    pub failed: Vec<NamespacedKey>,
}

impl fmt::Display for ReloadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} added, {} removed, {} updated, {} failed",
            self.added.len(),
            self.removed.len(),
            self.updated,
            self.failed.len()
        )
    }
}

/// Thread-safe registry of stats
pub struct StatRegistry {
    index: ArcSwap<StatIndex>,
    writer: Mutex<()>,
}

impl StatRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            index: ArcSwap::from_pointee(StatIndex::new()),
            writer: Mutex::new(()),
        }
    }

    /// Create a registry holding every enabled stat of a config
    pub fn from_config(config: &StatsConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let registry = Self::new();
        registry.reload(config);
        Ok(registry)
    }

    /// Apply one edit to a private copy of the index and publish it
    fn write<R>(&self, edit: impl FnOnce(&mut StatIndex) -> R) -> R {
        let _guard = self.writer.lock();
        let mut next = StatIndex::clone(&self.index.load());
        let result = edit(&mut next);
        self.index.store(Arc::new(next));
        result
    }

    /// Insert a stat, replacing any stat already registered under its key
    pub fn add_new_stat(&self, stat: Arc<Stat>) {
        self.write(|index| {
            index.remove(stat.key());
            index.insert(stat.key().clone(), stat);
        });
    }

    /// Build a stat from its definition and register it
    pub fn register(&self, def: &StatDef) -> Result<Arc<Stat>, ConfigError> {
        let stat = Arc::new(Stat::from_def(def)?);
        self.add_new_stat(Arc::clone(&stat));
        Ok(stat)
    }

    /// Remove whatever stat is registered under this stat's key
    pub fn remove_stat(&self, stat: &Stat) -> Option<Arc<Stat>> {
        self.write(|index| index.remove(stat.key()))
    }

    /// The currently published index
    pub fn snapshot(&self) -> Arc<StatIndex> {
        self.index.load_full()
    }

    /// Copy of every registered stat, in key order
    pub fn values(&self) -> Vec<Arc<Stat>> {
        self.index.load().values().cloned().collect()
    }

    pub fn get_by_key(&self, key: &NamespacedKey) -> Option<Arc<Stat>> {
        self.index.load().get(key).cloned()
    }

    /// Case-insensitive lookup by config name; first match in key order wins
    pub fn get_by_config(&self, name: &str) -> Option<Arc<Stat>> {
        let wanted = name.trim().to_lowercase();
        self.index
            .load()
            .values()
            .find(|stat| stat.config().name.trim().to_lowercase() == wanted)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.index.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.load().is_empty()
    }

    /// Re-read the configuration of every configured stat
    ///
    /// A stat that fails to update keeps its previous configuration and does
    /// not stop the others. Returns the keys that failed.
    pub fn update(&self, config: &StatsConfig) -> Vec<NamespacedKey> {
        self.write(|index| {
            let mut failed = Vec::new();
            for stat in index.values_mut().filter(|s| s.is_configured()) {
                match update_from(stat, config) {
                    Ok(next) => *stat = Arc::new(next),
                    Err(e) => {
                        log::warn!("Failed to update stat {}: {}", stat.key(), e);
                        failed.push(stat.key().clone());
                    }
                }
            }
            failed
        })
    }

    /// Bring the registry in line with a config in one publication
    ///
    /// Configured stats missing from the config (or disabled) are removed,
    /// new definitions are registered and the rest are replaced by their
    /// updated values. Host-provided stats are left untouched.
    pub fn reload(&self, config: &StatsConfig) -> ReloadSummary {
        let summary = self.write(|index| {
            let mut summary = ReloadSummary::default();

            index.retain(|key, stat| {
                let keep = !stat.is_configured() || find_enabled(config, key).is_some();
                if !keep {
                    summary.removed.push(key.clone());
                }
                keep
            });

            for def in config.enabled() {
                let key = match def.key() {
                    Ok(key) => key,
                    Err(e) => {
                        log::warn!("Skipping stat {:?}: {}", def.id, e);
                        continue;
                    }
                };
                match index.get(&key).cloned() {
                    Some(stat) if stat.is_configured() => match stat.update(def) {
                        Ok(next) => {
                            index.insert(key, Arc::new(next));
                            summary.updated += 1;
                        }
                        Err(e) => {
                            log::warn!("Failed to update stat {}: {}", key, e);
                            summary.failed.push(key);
                        }
                    },
                    Some(_) => {
                        log::warn!("Stat {} is provided by the host; config entry ignored", key);
                    }
                    None => match Stat::from_def(def) {
                        Ok(stat) => {
                            index.insert(key.clone(), Arc::new(stat));
                            summary.added.push(key);
                        }
                        Err(e) => {
                            log::warn!("Failed to create stat {}: {}", key, e);
                            summary.failed.push(key);
                        }
                    },
                }
            }

            summary
        });

        log::info!("Reloaded stats: {}", summary);
        summary
    }
}

impl Default for StatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatRegistry")
            .field("stats", &self.index.load().keys().collect::<Vec<_>>())
            .finish()
    }
}

fn find_enabled<'a>(config: &'a StatsConfig, key: &NamespacedKey) -> Option<&'a StatDef> {
    if key.namespace() != DEFAULT_NAMESPACE {
        return None;
    }
    config.enabled().find(|def| def.id == key.name())
}

fn update_from(stat: &Stat, config: &StatsConfig) -> Result<Stat, StatError> {
    let def = find_enabled(config, stat.key())
        .ok_or_else(|| StatError::MissingDefinition(stat.key().clone()))?;
    stat.update(def)
}
