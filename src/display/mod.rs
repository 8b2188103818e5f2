//! Item display
//!
//! Presentation-only rewriting of items on their way to the client.

pub mod engine;

pub use engine::{DisplayEngine, INJECTED_LINE_MARKER, is_injected_line};
