//! Fundamental types for the Heirloom death-verification engine.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! queries, per-source verdicts, aggregate verdicts, confidence tiers, timestamps,
//! deployment stages, and the injectable clock and randomness seams.

pub mod error;
pub mod query;
pub mod random;
pub mod stage;
pub mod time;
pub mod verdict;

pub use error::QueryError;
pub use query::VerificationQuery;
pub use random::RandomSource;
pub use stage::DeploymentStage;
pub use time::{Clock, SystemClock, Timestamp};
pub use verdict::{AggregateVerdict, ConfidenceTier, SourceVerdict, VerificationRecord};
