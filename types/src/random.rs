//! Randomness seam.

/// A source of uniformly distributed values in `[0.0, 1.0)`.
///
/// Injected wherever behaviour is deliberately non-deterministic so tests can
/// pin the outcome.
pub trait RandomSource: Send + Sync {
    fn next_f64(&self) -> f64;
}
