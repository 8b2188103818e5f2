//! Stat configuration
//!
//! This module handles loading stat definitions from external RON files,
//! allowing stats to be added, renamed and removed without a rebuild.

pub mod loader;
pub mod stats;

pub use loader::{default_config_path, export_defaults, load_from, load_or_default, STATS_FILE};
pub use stats::{
    default_stats_config, ConfigError, StatDef, StatKind, StatsConfig, NAME_PLACEHOLDER,
    VALUE_PLACEHOLDER,
};
