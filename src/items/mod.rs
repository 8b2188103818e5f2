//! Item system

pub mod item;
pub mod key;
pub mod data;

pub use item::{ItemStack, Material};
pub use key::{NamespacedKey, KeyParseError, DEFAULT_NAMESPACE};
pub use data::PersistentData;
