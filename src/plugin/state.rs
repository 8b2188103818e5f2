//! Plugin state
//!
//! Owns the registry for the lifetime of the host and wires it into the
//! selection service and the packet pipeline.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::{self, ConfigError, StatsConfig};
use crate::display::DisplayEngine;
use crate::items::{ItemStack, NamespacedKey};
use crate::protocol::{PacketPipeline, WindowItemsListener};
use crate::selection::{ActiveStatStore, SelectionResponse, SelectionService};
use crate::stats::{self, ReloadSummary, StatError, StatRegistry};

/// Running plugin instance
#[derive(Debug)]
pub struct ItemStats {
    config_path: PathBuf,
    registry: Arc<StatRegistry>,
    selection: SelectionService,
    engine: DisplayEngine,
    pipeline: PacketPipeline,
    /// Serializes reloads
    reload_lock: Mutex<()>,
}

impl ItemStats {
    /// Load the config at `config_path` and build every component
    pub fn enable(config_path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let config_path = config_path.into();
        let config = config::load_or_default(&config_path)?;
        let plugin = Self::with_config(config_path, &config)?;
        log::info!(
            "ItemStats enabled with {} stats from {}",
            plugin.registry.len(),
            plugin.config_path.display()
        );
        Ok(plugin)
    }

    /// Build from an already loaded config
    pub fn with_config(config_path: impl Into<PathBuf>, config: &StatsConfig) -> Result<Self, ConfigError> {
        let registry = Arc::new(StatRegistry::from_config(config)?);
        let store = ActiveStatStore::new(Arc::clone(&registry));
        let engine = DisplayEngine::new(store.clone());

        let mut pipeline = PacketPipeline::new();
        pipeline.register(Arc::new(WindowItemsListener::new(engine.clone())));

        Ok(Self {
            config_path: config_path.into(),
            registry,
            selection: SelectionService::new(store),
            engine,
            pipeline,
            reload_lock: Mutex::new(()),
        })
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn registry(&self) -> &Arc<StatRegistry> {
        &self.registry
    }

    pub fn engine(&self) -> &DisplayEngine {
        &self.engine
    }

    /// Outgoing packet hooks to install on the transport
    pub fn pipeline(&self) -> &PacketPipeline {
        &self.pipeline
    }

    /// Re-read the config file and apply it
    ///
    /// A config that fails to load, including one that no longer exists,
    /// leaves the current stats in place.
    pub fn reload(&self) -> Result<ReloadSummary, ConfigError> {
        let _guard = self.reload_lock.lock();
        let config = config::load_from(&self.config_path).map_err(|e| {
            log::warn!("Keeping current stats, config reload failed: {}", e);
            e
        })?;
        let summary = self.registry.reload(&config);
        self.engine.reset_faults();
        Ok(summary)
    }

    /// Handle the `/activestat [stat]` command for the item in hand
    pub fn activestat(&self, actor: &str, held: Option<&mut ItemStack>, args: &[String]) -> SelectionResponse {
        let requested = args.first().map(String::as_str);
        self.selection.select_active_stat(actor, held, requested).into()
    }

    /// Add to a tracked counter on an item, e.g. after a kill
    pub fn record(&self, item: &mut ItemStack, key: &NamespacedKey, amount: f64) -> Result<Option<f64>, StatError> {
        match self.registry.get_by_key(key) {
            Some(stat) => stats::record(item, &stat, amount).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use crate::config::{StatDef, StatKind};
    use crate::display::is_injected_line;
    use crate::protocol::{Packet, WindowItems};

    fn scratch_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("itemstats-plugin-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir.join(config::STATS_FILE)
    }

    fn write_config(path: &Path, config: &StatsConfig) {
        let text = ron::ser::to_string_pretty(config, ron::ser::PrettyConfig::default()).unwrap();
        fs::write(path, text).unwrap();
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_enable_with_defaults() {
        let plugin = ItemStats::enable(scratch_path("defaults")).unwrap();
        assert_eq!(plugin.registry().len(), 5);
    }

    #[test]
    fn test_command_record_and_display() {
        let plugin = ItemStats::enable(scratch_path("flow")).unwrap();
        let mut sword = ItemStack::new("IRON_SWORD");

        let response = plugin.activestat("alex", Some(&mut sword), &args(&["kills"]));
        assert_eq!(response, SelectionResponse::Activated("Kills".to_string()));

        let kills = NamespacedKey::itemstats("kills").unwrap();
        assert_eq!(plugin.record(&mut sword, &kills, 1.0).unwrap(), Some(1.0));
        assert_eq!(plugin.record(&mut sword, &kills, 1.0).unwrap(), Some(2.0));
        let unknown = NamespacedKey::itemstats("unknown").unwrap();
        assert_eq!(plugin.record(&mut sword, &unknown, 1.0).unwrap(), None);

        let mut packet = Packet::WindowItems(WindowItems {
            window_id: 0,
            state_id: 0,
            items: Some(vec![sword.clone()]),
            carried: ItemStack::empty(),
        });
        plugin.pipeline().dispatch_outgoing(&mut packet);
        let Packet::WindowItems(window) = packet else {
            panic!("packet type changed");
        };
        let items = window.items.unwrap();
        let shown = &items[0];
        assert!(is_injected_line(&shown.lore[0]));
        assert!(shown.lore[0].ends_with('2'));
        assert!(sword.lore.is_empty());

        let response = plugin.activestat("alex", Some(&mut sword), &[]);
        assert_eq!(response, SelectionResponse::Cleared);
        assert!(plugin.engine().store().get_active_stat(&sword).is_none());
    }

    #[test]
    fn test_reload_applies_changes() {
        let path = scratch_path("reload");
        write_config(&path, &StatsConfig {
            stats: vec![StatDef::new("kills", "Kills", "%value%", StatKind::Counter)],
        });
        let plugin = ItemStats::enable(&path).unwrap();
        let kills = plugin.registry().get_by_config("kills").unwrap();

        write_config(&path, &StatsConfig {
            stats: vec![
                StatDef::new("kills", "Slain", "%value%", StatKind::Counter),
                StatDef::new("blocks", "Blocks", "%value%", StatKind::Counter),
            ],
        });
        let summary = plugin.reload().unwrap();
        assert_eq!(summary.added.len(), 1);
        assert_eq!(summary.updated, 1);
        assert!(kills.same_stat(&plugin.registry().get_by_config("slain").unwrap()));
    }

    #[test]
    fn test_broken_reload_keeps_stats() {
        let path = scratch_path("broken");
        write_config(&path, &StatsConfig {
            stats: vec![StatDef::new("kills", "Kills", "%value%", StatKind::Counter)],
        });
        let plugin = ItemStats::enable(&path).unwrap();

        write_config(&path, &StatsConfig {
            stats: vec![
                StatDef::new("kills", "Kills", "%value%", StatKind::Counter),
                StatDef::new("mobs", "KILLS", "%value%", StatKind::Counter),
            ],
        });
        assert!(matches!(plugin.reload(), Err(ConfigError::DuplicateName { .. })));
        assert_eq!(plugin.registry().len(), 1);
        assert!(plugin.registry().get_by_config("kills").is_some());
    }

    #[test]
    fn test_deleted_config_keeps_stats() {
        let path = scratch_path("deleted");
        write_config(&path, &StatsConfig {
            stats: vec![StatDef::new("kills", "Slain", "%value%", StatKind::Counter)],
        });
        let plugin = ItemStats::enable(&path).unwrap();

        fs::remove_file(&path).unwrap();
        assert!(matches!(plugin.reload(), Err(ConfigError::Io { .. })));
        assert_eq!(plugin.registry().len(), 1);
        assert!(plugin.registry().get_by_config("slain").is_some());
    }

    #[test]
    fn test_reload_resets_reported_faults() {
        let path = scratch_path("faults");
        write_config(&path, &StatsConfig {
            stats: vec![StatDef::new("kills", "Kills", "%value%", StatKind::Counter)],
        });
        let plugin = ItemStats::enable(&path).unwrap();

        let mut sword = ItemStack::new("IRON_SWORD");
        plugin.activestat("alex", Some(&mut sword), &args(&["kills"]));
        sword.data.set(NamespacedKey::itemstats("kills").unwrap(), "many");
        plugin.engine().rewrite_for_display(&sword);
        assert_eq!(plugin.engine().fault_count(), 1);

        plugin.reload().unwrap();
        assert_eq!(plugin.engine().fault_count(), 0);
    }
}
