//! Mock verification for non-production stages.
//!
//! A small demo table of deceased persons keyed by `first_last`. A name in
//! the table only matches when a random draw falls under the configured
//! probability, so demos see both outcomes.

use heirloom_types::{
    AggregateVerdict, Clock, ConfidenceTier, RandomSource, SourceVerdict, VerificationQuery,
    VerificationRecord,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::aggregator::NO_MATCH;

/// Source name reported by mock matches.
pub const MOCK_SOURCE: &str = "SSDI (mock)";

/// Default chance that a table entry matches.
pub const DEFAULT_MATCH_PROBABILITY: f64 = 0.3;

/// A demo death record.
#[derive(Clone, Debug)]
pub struct MockEntry {
    pub date_of_death: String,
    pub location: String,
    pub verification_id: String,
}

/// [`RandomSource`] backed by `StdRng`.
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    /// Seeded for reproducible runs, or from OS entropy when `seed` is `None`.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&self) -> f64 {
        self.rng
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .gen::<f64>()
    }
}

/// Answers queries from the demo table.
pub struct MockVerifier {
    table: HashMap<String, MockEntry>,
    random: Arc<dyn RandomSource>,
    match_probability: f64,
    clock: Arc<dyn Clock>,
}

impl MockVerifier {
    /// `match_probability` is clamped to `[0, 1]`; a non-finite value disables matching.
    pub fn new(
        random: Arc<dyn RandomSource>,
        match_probability: f64,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let match_probability = if match_probability.is_finite() {
            match_probability.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            table: demo_table(),
            random,
            match_probability,
            clock,
        }
    }

    /// Replace the demo table.
    pub fn with_table(mut self, table: HashMap<String, MockEntry>) -> Self {
        self.table = table;
        self
    }

    pub fn match_probability(&self) -> f64 {
        self.match_probability
    }

    pub fn verify(&self, query: &VerificationQuery) -> AggregateVerdict {
        let Some(entry) = query.name_key().and_then(|key| self.table.get(&key)) else {
            return AggregateVerdict::unverified(NO_MATCH);
        };

        let draw = self.random.next_f64();
        if draw >= self.match_probability {
            tracing::debug!(draw, p = self.match_probability, "mock entry withheld by draw");
            return AggregateVerdict::unverified(NO_MATCH);
        }

        let record = VerificationRecord::new(
            query.full_name(),
            query.date_of_birth(),
            entry.date_of_death.clone(),
            Some(entry.location.clone()),
            query.country(),
            ConfidenceTier::High,
            entry.verification_id.clone(),
            self.clock.now(),
        );
        AggregateVerdict::from_single(SourceVerdict::matched(MOCK_SOURCE, record))
    }
}

fn demo_table() -> HashMap<String, MockEntry> {
    [
        ("john_doe", "2024-01-15", "New York, NY", "MOCK-SSDI-0001"),
        ("jane_smith", "2023-11-02", "Los Angeles, CA", "MOCK-SSDI-0002"),
        ("robert_johnson", "2024-06-30", "Chicago, IL", "MOCK-SSDI-0003"),
    ]
    .into_iter()
    .map(|(key, dod, location, id)| {
        (
            key.to_string(),
            MockEntry {
                date_of_death: dod.to_string(),
                location: location.to_string(),
                verification_id: id.to_string(),
            },
        )
    })
    .collect()
}
