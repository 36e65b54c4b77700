//! Shared utilities for the Heirloom engine.

pub mod logging;
pub mod stats;

pub use logging::{init_tracing, LogFormat};
pub use stats::HitCounter;
