//! Validation errors for verification queries.

use thiserror::Error;

/// Why a [`VerificationQuery`](crate::VerificationQuery) was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("full name must not be empty")]
    EmptyName,

    #[error("country must not be empty")]
    EmptyCountry,

    #[error("invalid {field} date {value:?}: expected YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },
}
