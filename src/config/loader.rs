//! RON config loader
//!
//! Loads stat definitions from an external RON file, with fallback to
//! hardcoded defaults.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use super::stats::{default_stats_config, ConfigError, StatsConfig};

/// File name of the stats config inside the config directory
pub const STATS_FILE: &str = "stats.ron";

/// Get the default config file path
pub fn default_config_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "itemstats", "ItemStats") {
        proj_dirs.config_dir().join(STATS_FILE)
    } else {
        // Fallback to current directory
        PathBuf::from("./config").join(STATS_FILE)
    }
}

/// Load and validate a config file
pub fn load_from(path: &Path) -> Result<StatsConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: StatsConfig = ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;

    log::debug!("Loaded {} stat definitions from {}", config.stats.len(), path.display());
    Ok(config)
}

/// Load a config file, using the built-in defaults if it does not exist
///
/// A file that exists but fails to load is an error.
pub fn load_or_default(path: &Path) -> Result<StatsConfig, ConfigError> {
    if path.exists() {
        load_from(path)
    } else {
        log::warn!("No stats config at {}, using defaults", path.display());
        Ok(default_stats_config())
    }
}

/// Export the default definitions for easy editing
pub fn export_defaults(path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
    }

    let text = ron::ser::to_string_pretty(&default_stats_config(), ron::ser::PrettyConfig::default())?;
    fs::write(path, text).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!("Exported default stats config to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::stats::{StatDef, StatKind};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("itemstats-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_export_then_load() {
        let path = scratch_dir("export").join(STATS_FILE);
        export_defaults(&path).unwrap();
        assert!(path.exists(), "stats.ron not created");

        let config = load_from(&path).unwrap();
        assert_eq!(config, default_stats_config());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = scratch_dir("missing").join(STATS_FILE);
        let config = load_or_default(&path).unwrap();
        assert_eq!(config, default_stats_config());
        assert!(matches!(load_from(&path), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_broken_file_is_an_error() {
        let dir = scratch_dir("broken");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(STATS_FILE);
        fs::write(&path, "(stats: [ (id: ").unwrap();
        assert!(matches!(load_or_default(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_invalid_definitions_rejected_on_load() {
        let dir = scratch_dir("invalid");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(STATS_FILE);
        let config = StatsConfig {
            stats: vec![
                StatDef::new("kills", "Kills", "%value%", StatKind::Counter),
                StatDef::new("mobs", "kills", "%value%", StatKind::Counter),
            ],
        };
        let text = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default()).unwrap();
        fs::write(&path, text).unwrap();
        assert!(matches!(load_from(&path), Err(ConfigError::DuplicateName { .. })));
    }
}
