use thiserror::Error;

/// Failures inside a source adapter.
///
/// These never leave the adapter: `probe` turns them into an unverified verdict.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source unreachable: {0}")]
    Unreachable(String),

    #[error("request to source failed: {0}")]
    RequestFailed(String),

    #[error("invalid response from source: {0}")]
    InvalidResponse(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no government registry configured for country {0}")]
    UnmappedCountry(String),
}
