//! Stat system
//!
//! Stats, their computations, the registry that holds them and the
//! counters tracked on items.

pub mod stat;
pub mod kinds;
pub mod format;
pub mod registry;
pub mod tracker;

pub use stat::{Stat, StatConfig, StatComputation, StatError, DisplayFragment};
pub use kinds::ConfiguredComputation;
pub use format::{colorize, format_value, SECTION_SIGN};
pub use registry::{StatRegistry, StatIndex, ReloadSummary};
pub use tracker::{record, tracked_value};
