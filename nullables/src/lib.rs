//! Nullable infrastructure for deterministic testing.
//!
//! Every external dependency of the engine (clock, randomness, HTTP, whole
//! sources) sits behind a trait. This crate provides test-friendly
//! implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod random;
pub mod source;
pub mod transport;

pub use clock::NullClock;
pub use random::NullRandom;
pub use source::NullSource;
pub use transport::NullTransport;
