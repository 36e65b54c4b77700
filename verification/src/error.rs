use heirloom_types::QueryError;
use thiserror::Error;

/// Failures on the verification path.
///
/// Callers of `verify_death` never see these: they are folded into an
/// unverified, low-confidence verdict at the entry point.
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("invalid query: {0}")]
    InvalidQuery(#[from] QueryError),

    #[error("configuration error: {0}")]
    Config(String),
}
