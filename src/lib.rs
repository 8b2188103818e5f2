//! ItemStats - per-item stats shown on the wire
//!
//! Tracks stats on item instances, lets players pick one stat to show per
//! item, and injects that stat into the item's description as inventory
//! packets leave the server, without touching the stored item.

pub mod items;
pub mod config;
pub mod stats;
pub mod selection;
pub mod display;
pub mod protocol;
pub mod plugin;

// Re-export commonly used types
pub use items::{ItemStack, NamespacedKey, PersistentData};
pub use stats::{Stat, StatRegistry};
pub use selection::{SelectionService, SelectionResponse};
pub use display::DisplayEngine;
pub use protocol::{Packet, PacketPipeline};
pub use plugin::ItemStats;
