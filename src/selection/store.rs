//! Active stat store
//!
//! Reads and writes the tag naming the stat selected for display on an item.

use std::sync::Arc;

use crate::items::{ItemStack, NamespacedKey, DEFAULT_NAMESPACE};
use crate::stats::{Stat, StatRegistry};

/// Name of the tag holding the active stat key
pub const ACTIVE_STAT_TAG: &str = "active_stat";

/// Tag key under which the active stat is persisted
pub fn active_stat_key() -> NamespacedKey {
    NamespacedKey::from_static(DEFAULT_NAMESPACE, ACTIVE_STAT_TAG)
}

/// Accessor for the per-item active stat selection
#[derive(Debug, Clone)]
pub struct ActiveStatStore {
    registry: Arc<StatRegistry>,
    tag: NamespacedKey,
}

impl ActiveStatStore {
    pub fn new(registry: Arc<StatRegistry>) -> Self {
        Self {
            registry,
            tag: active_stat_key(),
        }
    }

    pub fn registry(&self) -> &Arc<StatRegistry> {
        &self.registry
    }

    /// Raw key stored on the item, if it parses
    pub fn active_key(&self, item: &ItemStack) -> Option<NamespacedKey> {
        item.data.get(&self.tag)?.parse().ok()
    }

    /// Resolve the item's active stat; stale or unknown keys resolve to none
    pub fn get_active_stat(&self, item: &ItemStack) -> Option<Arc<Stat>> {
        let key = self.active_key(item)?;
        self.registry.get_by_key(&key)
    }

    /// Select a stat for display, replacing any previous selection
    pub fn set_active_stat(&self, item: &mut ItemStack, stat: &Stat) {
        item.data.set(self.tag.clone(), stat.key().to_string());
    }

    /// Remove the selection entirely
    pub fn clear_active_stat(&self, item: &mut ItemStack) {
        item.data.remove(&self.tag);
    }
}
