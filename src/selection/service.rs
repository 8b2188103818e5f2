//! Active stat selection
//!
//! Validates a "select active stat" request from the command surface and
//! applies it to the held item.

use std::sync::Arc;

use thiserror::Error;

use crate::items::{ItemStack, NamespacedKey};
use crate::stats::Stat;
use super::store::ActiveStatStore;

/// Successful selection outcomes
#[derive(Debug, Clone)]
pub enum SelectionOutcome {
    /// The selection was removed
    Cleared,
    /// The stat is now displayed on the item
    Activated(Arc<Stat>),
}

/// Rejected selection requests
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("no item held")]
    NoItemHeld,
    #[error("unknown stat {0:?}")]
    UnknownStat(String),
}

/// Flat classification handed back to the command surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionResponse {
    NoItemHeld,
    Cleared,
    UnknownStat,
    Activated(String),
}

impl SelectionResponse {
    /// Localization key for the message shown to the actor
    pub fn message_key(&self) -> &'static str {
        match self {
            SelectionResponse::NoItemHeld => "must-hold-item",
            SelectionResponse::Cleared => "removed-stat",
            SelectionResponse::UnknownStat => "invalid-stat",
            SelectionResponse::Activated(_) => "set-active-stat",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SelectionResponse::Cleared | SelectionResponse::Activated(_))
    }
}

impl From<Result<SelectionOutcome, SelectionError>> for SelectionResponse {
    fn from(result: Result<SelectionOutcome, SelectionError>) -> Self {
        match result {
            Ok(SelectionOutcome::Cleared) => SelectionResponse::Cleared,
            Ok(SelectionOutcome::Activated(stat)) => SelectionResponse::Activated(stat.config_name()),
            Err(SelectionError::NoItemHeld) => SelectionResponse::NoItemHeld,
            Err(SelectionError::UnknownStat(_)) => SelectionResponse::UnknownStat,
        }
    }
}

/// Applies selection requests against the registry and the store
#[derive(Debug, Clone)]
pub struct SelectionService {
    store: ActiveStatStore,
}

impl SelectionService {
    pub fn new(store: ActiveStatStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ActiveStatStore {
        &self.store
    }

    /// Resolve a free-text request: config name first, then a stat key
    pub fn resolve(&self, requested: &str) -> Option<Arc<Stat>> {
        let registry = self.store.registry();
        registry.get_by_config(requested).or_else(|| {
            requested
                .trim()
                .parse::<NamespacedKey>()
                .ok()
                .and_then(|key| registry.get_by_key(&key))
        })
    }

    /// Select (or clear, for a blank request) the active stat on the held item
    pub fn select_active_stat(
        &self,
        actor: &str,
        held: Option<&mut ItemStack>,
        requested: Option<&str>,
    ) -> Result<SelectionOutcome, SelectionError> {
        let item = match held {
            Some(item) if !item.is_empty() => item,
            _ => return Err(SelectionError::NoItemHeld),
        };

        let requested = match requested.map(str::trim).filter(|r| !r.is_empty()) {
            Some(requested) => requested,
            None => {
                self.store.clear_active_stat(item);
                log::debug!("{} cleared the active stat on {}", actor, item.material);
                return Ok(SelectionOutcome::Cleared);
            }
        };

        let stat = self
            .resolve(requested)
            .ok_or_else(|| SelectionError::UnknownStat(requested.to_string()))?;
        self.store.set_active_stat(item, &stat);
        log::debug!("{} set active stat {} on {}", actor, stat.key(), item.material);
        Ok(SelectionOutcome::Activated(stat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_stats_config;
    use crate::stats::StatRegistry;

    fn service() -> SelectionService {
        let registry = StatRegistry::from_config(&default_stats_config()).unwrap();
        SelectionService::new(ActiveStatStore::new(Arc::new(registry)))
    }

    fn active_name(service: &SelectionService, item: &ItemStack) -> Option<String> {
        service.store().get_active_stat(item).map(|s| s.config_name())
    }

    #[test]
    fn test_no_item_held() {
        let service = service();
        assert_eq!(
            service.select_active_stat("steve", None, Some("Damage")).unwrap_err(),
            SelectionError::NoItemHeld
        );

        let mut air = ItemStack::empty();
        assert_eq!(
            service.select_active_stat("steve", Some(&mut air), Some("Damage")).unwrap_err(),
            SelectionError::NoItemHeld
        );
        assert!(air.data.is_empty());
    }

    #[test]
    fn test_select_round_trip() {
        let service = service();
        let mut sword = ItemStack::new("DIAMOND_SWORD");

        let outcome = service.select_active_stat("steve", Some(&mut sword), Some("damage")).unwrap();
        match outcome {
            SelectionOutcome::Activated(stat) => assert_eq!(stat.config_name(), "Damage"),
            other => panic!("expected activation, got {:?}", other),
        }
        assert_eq!(active_name(&service, &sword).as_deref(), Some("Damage"));
    }

    #[test]
    fn test_select_by_key_fallback() {
        let service = service();
        let mut sword = ItemStack::new("DIAMOND_SWORD");
        service
            .select_active_stat("steve", Some(&mut sword), Some("itemstats:damage_dealt"))
            .unwrap();
        assert_eq!(active_name(&service, &sword).as_deref(), Some("Damage"));
    }

    #[test]
    fn test_clear_semantics() {
        let service = service();
        let mut sword = ItemStack::new("DIAMOND_SWORD");
        service.select_active_stat("steve", Some(&mut sword), Some("Kills")).unwrap();

        for request in [None, Some(""), Some("   ")] {
            service.select_active_stat("steve", Some(&mut sword), Some("Kills")).unwrap();
            let outcome = service.select_active_stat("steve", Some(&mut sword), request).unwrap();
            assert!(matches!(outcome, SelectionOutcome::Cleared));
            assert!(active_name(&service, &sword).is_none());
        }
    }

    #[test]
    fn test_unknown_stat_leaves_selection() {
        let service = service();
        let mut sword = ItemStack::new("DIAMOND_SWORD");
        service.select_active_stat("steve", Some(&mut sword), Some("Kills")).unwrap();
        let before = sword.clone();

        let err = service
            .select_active_stat("steve", Some(&mut sword), Some("NotARealStat"))
            .unwrap_err();
        assert_eq!(err, SelectionError::UnknownStat("NotARealStat".to_string()));
        assert_eq!(sword, before);
        assert_eq!(active_name(&service, &sword).as_deref(), Some("Kills"));
    }

    #[test]
    fn test_response_classification() {
        let service = service();
        let mut sword = ItemStack::new("DIAMOND_SWORD");

        let response: SelectionResponse =
            service.select_active_stat("steve", Some(&mut sword), Some("KILLS")).into();
        assert_eq!(response, SelectionResponse::Activated("Kills".to_string()));
        assert_eq!(response.message_key(), "set-active-stat");

        let response: SelectionResponse = service.select_active_stat("steve", None, None).into();
        assert_eq!(response, SelectionResponse::NoItemHeld);
        assert_eq!(response.message_key(), "must-hold-item");
        assert!(!response.is_success());

        let response: SelectionResponse =
            service.select_active_stat("steve", Some(&mut sword), Some("nope")).into();
        assert_eq!(response.message_key(), "invalid-stat");

        let response: SelectionResponse =
            service.select_active_stat("steve", Some(&mut sword), None).into();
        assert_eq!(response.message_key(), "removed-stat");
        assert!(response.is_success());
    }
}
