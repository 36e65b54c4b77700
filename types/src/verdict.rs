//! Verdicts: what one source says, and what all sources say together.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::time::Timestamp;

/// Ordinal trust rating of a verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    Low,
    Medium,
    High,
}

impl ConfidenceTier {
    /// Numeric weight used to pick the primary record (`high`=3, `medium`=2, `low`=1).
    pub fn weight(&self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized death record issued by one source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    full_name: String,
    date_of_birth: String,
    date_of_death: String,
    location: Option<String>,
    country: String,
    source_tier: ConfidenceTier,
    verification_id: String,
    issued_at: Timestamp,
}

impl VerificationRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        full_name: impl Into<String>,
        date_of_birth: impl Into<String>,
        date_of_death: impl Into<String>,
        location: Option<String>,
        country: impl Into<String>,
        source_tier: ConfidenceTier,
        verification_id: impl Into<String>,
        issued_at: Timestamp,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            date_of_birth: date_of_birth.into(),
            date_of_death: date_of_death.into(),
            location,
            country: country.into(),
            source_tier,
            verification_id: verification_id.into(),
            issued_at,
        }
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn date_of_birth(&self) -> &str {
        &self.date_of_birth
    }

    pub fn date_of_death(&self) -> &str {
        &self.date_of_death
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn source_tier(&self) -> ConfidenceTier {
        self.source_tier
    }

    pub fn verification_id(&self) -> &str {
        &self.verification_id
    }

    pub fn issued_at(&self) -> Timestamp {
        self.issued_at
    }
}

/// One source's answer.
///
/// Sources never fail past their own boundary: a failure is an unverified,
/// low-confidence verdict carrying the error message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceVerdict {
    pub is_verified: bool,
    pub data: Option<VerificationRecord>,
    pub source_name: String,
    pub confidence: ConfidenceTier,
    pub error: Option<String>,
}

impl SourceVerdict {
    /// A positive match. The tier is taken from the record.
    pub fn matched(source_name: impl Into<String>, record: VerificationRecord) -> Self {
        Self {
            is_verified: true,
            confidence: record.source_tier(),
            data: Some(record),
            source_name: source_name.into(),
            error: None,
        }
    }

    /// The source answered and found nothing.
    pub fn not_found(source_name: impl Into<String>) -> Self {
        Self {
            is_verified: false,
            data: None,
            source_name: source_name.into(),
            confidence: ConfidenceTier::Low,
            error: None,
        }
    }

    /// The source could not answer.
    pub fn failed(source_name: impl Into<String>, error: impl fmt::Display) -> Self {
        Self {
            is_verified: false,
            data: None,
            source_name: source_name.into(),
            confidence: ConfidenceTier::Low,
            error: Some(error.to_string()),
        }
    }
}

/// The combined answer across all responding sources.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateVerdict {
    pub is_verified: bool,
    pub record: Option<VerificationRecord>,
    /// Contributing source names, deduplicated, in priority order.
    pub sources: Vec<String>,
    pub confidence: ConfidenceTier,
    pub error: Option<String>,
}

impl AggregateVerdict {
    /// An unverified, low-confidence answer carrying `error`.
    pub fn unverified(error: impl Into<String>) -> Self {
        Self {
            is_verified: false,
            record: None,
            sources: Vec::new(),
            confidence: ConfidenceTier::Low,
            error: Some(error.into()),
        }
    }

    /// Lift a single contributing verdict unchanged.
    ///
    /// An unverified input stays unverified; a verified input without a
    /// record cannot honour the record invariant and is downgraded.
    pub fn from_single(verdict: SourceVerdict) -> Self {
        if verdict.is_verified && verdict.data.is_none() {
            return Self::unverified(format!(
                "{} reported a match without a record",
                verdict.source_name
            ));
        }
        Self {
            is_verified: verdict.is_verified,
            record: verdict.data,
            sources: vec![verdict.source_name],
            confidence: verdict.confidence,
            error: verdict.error,
        }
    }
}
