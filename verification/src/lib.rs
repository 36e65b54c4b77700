//! Multi-source death verification.
//!
//! A query flows through four stages:
//! 1. **Environment policy**: non-production stages answer from mock data.
//! 2. **Cache**: a verdict for the same (name, date of birth, country) within
//!    the TTL is returned without asking any source.
//! 3. **Aggregator**: every source is asked concurrently; the verified
//!    answers are combined into one verdict with a derived confidence.
//! 4. **Cache write**: the combined verdict is stored before it is returned.
//!
//! The [`health`] module reports per-source availability alongside.

pub mod aggregator;
pub mod cache;
pub mod config;
pub mod error;
pub mod health;
pub mod mock;
pub mod policy;
pub mod service;

pub use aggregator::{combine, Aggregator, SourceOutcome, NO_MATCH};
pub use cache::{CacheStats, MemoryCache, VerdictCache};
pub use config::ServiceConfig;
pub use error::VerificationError;
pub use health::HealthReport;
pub use mock::{MockVerifier, SeededRandom};
pub use policy::EnvironmentPolicy;
pub use service::DeathVerificationService;
