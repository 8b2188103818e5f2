//! Plugin lifecycle
//!
//! Enable, reload and command handling for the host application.

pub mod state;

pub use state::ItemStats;
