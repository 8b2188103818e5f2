//! Stat tracking
//!
//! Counter stats keep their running total on the item itself, stored in the
//! persistent data block under the stat's own key.

use crate::items::{ItemStack, NamespacedKey};
use super::stat::{Stat, StatError};

/// Read the tracked total for a key (0 when nothing has been recorded)
pub fn tracked_value(item: &ItemStack, key: &NamespacedKey) -> Result<f64, StatError> {
    match item.data.get(key) {
        None => Ok(0.0),
        Some(raw) => match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(StatError::MalformedCounter {
                key: key.clone(),
                value: raw.to_string(),
            }),
        },
    }
}

/// Add to a stat's tracked total, returning the new total
///
/// Empty slots are ignored. A malformed existing value is overwritten. A
/// total that would overflow is rejected and the stored value kept.
pub fn record(item: &mut ItemStack, stat: &Stat, amount: f64) -> Result<f64, StatError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(StatError::InvalidAmount {
            key: stat.key().clone(),
            amount,
        });
    }
    if item.is_empty() {
        return Ok(0.0);
    }

    let current = tracked_value(item, stat.key()).unwrap_or_else(|e| {
        log::warn!("Resetting counter: {}", e);
        0.0
    });
    let total = current + amount;
    if !total.is_finite() {
        return Err(StatError::CounterOverflow {
            key: stat.key().clone(),
            amount,
        });
    }
    item.data.set(stat.key().clone(), total.to_string());
    Ok(total)
}
