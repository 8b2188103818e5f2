//! Built-in stat computations
//!
//! Config-defined stats dispatch on their [`StatKind`] at compute time, so a
//! reload can change a stat's kind without replacing the stat.

use crate::config::StatKind;
use crate::items::{ItemStack, NamespacedKey};
use super::format::format_value;
use super::stat::{DisplayFragment, StatComputation, StatConfig, StatError};
use super::tracker::tracked_value;

/// Computation used by every stat created from the config file
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfiguredComputation;

impl StatComputation for ConfiguredComputation {
    fn compute(
        &self,
        key: &NamespacedKey,
        config: &StatConfig,
        item: &ItemStack,
    ) -> Result<Option<DisplayFragment>, StatError> {
        if !config.applies_to(&item.material) {
            return Ok(None);
        }

        let value = match config.kind {
            StatKind::Counter => format_value(tracked_value(item, key)?),
            StatKind::Durability => match item.durability_left() {
                Some(left) => left.to_string(),
                None => return Ok(None),
            },
            StatKind::Enchantments => match item.enchantments.len() {
                0 => return Ok(None),
                n => n.to_string(),
            },
        };

        Ok(Some(DisplayFragment::single(config.render(&value))))
    }
}
