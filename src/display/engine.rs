//! Display rewrite engine
//!
//! Produces the client-facing view of an item by appending its active
//! stat's fragment to the description. The canonical item is never touched;
//! only the copy headed for the wire changes.
//!
//! Injected lines always start with [`INJECTED_LINE_MARKER`] and always sit
//! at the end of the description. Earlier injected lines are stripped before
//! appending, so rewriting an already rewritten view yields the same view.
//!
//! A failing stat is reported once until the faults are reset. A stat that
//! panicked is not run again until then.

use std::borrow::Cow;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::items::{ItemStack, NamespacedKey};
use crate::selection::ActiveStatStore;
use crate::stats::{DisplayFragment, Stat};

/// Invisible prefix marking description lines added by the engine
pub const INJECTED_LINE_MARKER: &str = "\u{200b}\u{2063}";

/// Whether a description line was added by the engine
pub fn is_injected_line(line: &str) -> bool {
    line.starts_with(INJECTED_LINE_MARKER)
}

#[derive(Debug, Clone, Copy)]
enum FaultKind {
    Failed,
    Panicked,
}

/// Stats whose computation has already been reported as failing
#[derive(Debug, Default)]
struct Faults {
    failed: HashSet<NamespacedKey>,
    panicked: HashSet<NamespacedKey>,
}

impl Faults {
    fn of(&self, kind: FaultKind) -> &HashSet<NamespacedKey> {
        match kind {
            FaultKind::Failed => &self.failed,
            FaultKind::Panicked => &self.panicked,
        }
    }

    fn of_mut(&mut self, kind: FaultKind) -> &mut HashSet<NamespacedKey> {
        match kind {
            FaultKind::Failed => &mut self.failed,
            FaultKind::Panicked => &mut self.panicked,
        }
    }
}

/// Rewrites outgoing item views to show their active stat
#[derive(Debug, Clone)]
pub struct DisplayEngine {
    store: ActiveStatStore,
    faults: Arc<RwLock<Faults>>,
}

impl DisplayEngine {
    pub fn new(store: ActiveStatStore) -> Self {
        Self {
            store,
            faults: Arc::new(RwLock::new(Faults::default())),
        }
    }

    pub fn store(&self) -> &ActiveStatStore {
        &self.store
    }

    /// Number of stats currently reported as failing
    pub fn fault_count(&self) -> usize {
        let faults = self.faults.read();
        faults.failed.len() + faults.panicked.len()
    }

    /// Forget reported faults, e.g. after a reload replaced the stats
    pub fn reset_faults(&self) {
        let mut faults = self.faults.write();
        faults.failed.clear();
        faults.panicked.clear();
    }

    /// Fragment for an item, or none if nothing should be shown
    fn fragment_for(&self, item: &ItemStack) -> Option<DisplayFragment> {
        if item.is_empty() {
            return None;
        }
        let stat = self.store.get_active_stat(item)?;
        self.compute_isolated(&stat, item).filter(|fragment| !fragment.is_empty())
    }

    /// Record a fault for `key`, returning whether it is new
    fn first_report(&self, key: &NamespacedKey, kind: FaultKind) -> bool {
        if self.faults.read().of(kind).contains(key) {
            return false;
        }
        self.faults.write().of_mut(kind).insert(key.clone())
    }

    /// Run a stat's computation, turning errors and panics into "no fragment"
    fn compute_isolated(&self, stat: &Stat, item: &ItemStack) -> Option<DisplayFragment> {
        if self.faults.read().of(FaultKind::Panicked).contains(stat.key()) {
            return None;
        }
        match panic::catch_unwind(AssertUnwindSafe(|| stat.compute(item))) {
            Ok(Ok(fragment)) => fragment,
            Ok(Err(e)) => {
                if self.first_report(stat.key(), FaultKind::Failed) {
                    log::warn!("Stat {} failed on {}: {}", stat.key(), item.material, e);
                } else {
                    log::debug!("Stat {} failed on {}: {}", stat.key(), item.material, e);
                }
                None
            }
            Err(payload) => {
                let reason = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                if self.first_report(stat.key(), FaultKind::Panicked) {
                    log::warn!(
                        "Stat {} panicked on {}: {}; disabled until reload",
                        stat.key(),
                        item.material,
                        reason
                    );
                }
                None
            }
        }
    }

    /// The view of `item` to send to the client
    pub fn rewrite_for_display<'a>(&self, item: &'a ItemStack) -> Cow<'a, ItemStack> {
        match self.fragment_for(item) {
            Some(fragment) => {
                let mut view = item.clone();
                inject(&mut view.lore, &fragment);
                Cow::Owned(view)
            }
            None => Cow::Borrowed(item),
        }
    }

    /// Rewrite one wire slot in place
    pub fn rewrite_slot(&self, slot: &mut ItemStack) {
        if let Some(fragment) = self.fragment_for(slot) {
            inject(&mut slot.lore, &fragment);
        }
    }

    /// Rewrite every slot of an outgoing item list, keeping length and order
    pub fn rewrite_items(&self, mut items: Vec<ItemStack>) -> Vec<ItemStack> {
        for slot in items.iter_mut() {
            self.rewrite_slot(slot);
        }
        items
    }
}

/// Replace previously injected lines with the fragment, at the end
fn inject(lore: &mut Vec<String>, fragment: &DisplayFragment) {
    lore.retain(|line| !is_injected_line(line));
    lore.extend(
        fragment
            .lines()
            .iter()
            .map(|line| format!("{}{}", INJECTED_LINE_MARKER, line)),
    );
}
