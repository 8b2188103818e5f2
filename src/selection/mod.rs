//! Active stat selection
//!
//! The per-item active stat tag and the service that changes it on request.

pub mod store;
pub mod service;

pub use store::{ActiveStatStore, ACTIVE_STAT_TAG, active_stat_key};
pub use service::{SelectionService, SelectionOutcome, SelectionError, SelectionResponse};
