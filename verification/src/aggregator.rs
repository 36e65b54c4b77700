//! Aggregator: fans a query out to every source and combines the verdicts.
//!
//! Sources run concurrently and the aggregator waits for all of them to
//! settle. A slow or failing source never blocks or voids the others; it
//! just contributes nothing.
//!
//! Combination rules over the verified verdicts:
//! - none: unverified, low confidence
//! - one: that verdict unchanged
//! - several: confidence `high` with at least two `high` verdicts, `medium`
//!   with one `high` or at least two verdicts of any tier, `low` otherwise;
//!   the primary record comes from the highest tier, ties going to the
//!   source listed first

use futures_util::future::join_all;
use heirloom_sources::{DeathSource, SourceError};
use heirloom_types::{AggregateVerdict, ConfidenceTier, SourceVerdict, VerificationQuery};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Message carried by an aggregate verdict when no source found a match.
pub const NO_MATCH: &str = "no verification found in any source";

/// One source's verdict and how long it took.
#[derive(Clone, Debug)]
pub struct SourceOutcome {
    pub verdict: SourceVerdict,
    pub elapsed: Duration,
}

/// Queries sources in parallel and combines their answers.
pub struct Aggregator {
    /// Sources in priority order, highest first.
    sources: Vec<Arc<dyn DeathSource>>,
    /// Upper bound on a single source's answer time.
    source_timeout: Option<Duration>,
}

impl Aggregator {
    /// `sources` is the priority list: on equal tiers, earlier sources win.
    pub fn new(sources: Vec<Arc<dyn DeathSource>>) -> Self {
        Self {
            sources,
            source_timeout: None,
        }
    }

    /// Treat a source that has not answered within `timeout` as unavailable.
    pub fn with_source_timeout(mut self, timeout: Duration) -> Self {
        self.source_timeout = Some(timeout);
        self
    }

    pub fn source_names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name().to_string()).collect()
    }

    /// Query every source concurrently and combine the results.
    pub async fn aggregate(&self, query: &VerificationQuery) -> AggregateVerdict {
        let verdicts = self
            .fan_out(query)
            .await
            .into_iter()
            .map(|outcome| outcome.verdict)
            .collect();
        combine(verdicts)
    }

    /// Query every source concurrently and return each verdict, in priority order.
    pub async fn fan_out(&self, query: &VerificationQuery) -> Vec<SourceOutcome> {
        let handles: Vec<_> = self
            .sources
            .iter()
            .map(|source| {
                let source = Arc::clone(source);
                let query = query.clone();
                let timeout = self.source_timeout;
                tokio::spawn(async move { probe_timed(source, query, timeout).await })
            })
            .collect();

        join_all(handles)
            .await
            .into_iter()
            .zip(&self.sources)
            .map(|(joined, source)| match joined {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!(source = source.name(), error = %e, "source task failed");
                    SourceOutcome {
                        verdict: SourceVerdict::failed(
                            source.name(),
                            SourceError::Unreachable(format!("source task failed: {e}")),
                        ),
                        elapsed: Duration::ZERO,
                    }
                }
            })
            .collect()
    }
}

async fn probe_timed(
    source: Arc<dyn DeathSource>,
    query: VerificationQuery,
    timeout: Option<Duration>,
) -> SourceOutcome {
    let started = Instant::now();
    let verdict = match timeout {
        Some(limit) => match tokio::time::timeout(limit, source.probe(&query)).await {
            Ok(verdict) => verdict,
            Err(_) => {
                tracing::warn!(source = source.name(), ?limit, "source timed out");
                SourceVerdict::failed(
                    source.name(),
                    SourceError::Unreachable(format!("no answer within {limit:?}")),
                )
            }
        },
        None => source.probe(&query).await,
    };
    SourceOutcome {
        verdict,
        elapsed: started.elapsed(),
    }
}

/// Combine verdicts given in priority order into one answer.
pub fn combine(verdicts: Vec<SourceVerdict>) -> AggregateVerdict {
    let mut contributing: Vec<SourceVerdict> = verdicts
        .into_iter()
        .filter(|v| {
            if v.is_verified && v.data.is_none() {
                tracing::debug!(source = %v.source_name, "dropping match without a record");
            }
            v.is_verified && v.data.is_some()
        })
        .collect();

    match contributing.len() {
        0 => AggregateVerdict::unverified(NO_MATCH),
        1 => AggregateVerdict::from_single(contributing.remove(0)),
        _ => {
            let confidence = derive_confidence(&contributing);
            let sources = dedup_sources(&contributing);
            let record = primary(contributing).and_then(|v| v.data);
            AggregateVerdict {
                is_verified: record.is_some(),
                record,
                sources,
                confidence,
                error: None,
            }
        }
    }
}

/// Confidence for two or more contributing verdicts.
pub fn derive_confidence(contributing: &[SourceVerdict]) -> ConfidenceTier {
    let high = contributing
        .iter()
        .filter(|v| v.confidence == ConfidenceTier::High)
        .count();
    if high >= 2 {
        ConfidenceTier::High
    } else if high >= 1 || contributing.len() >= 2 {
        ConfidenceTier::Medium
    } else {
        ConfidenceTier::Low
    }
}

/// The highest-tier verdict; the earliest wins among equals.
fn primary(contributing: Vec<SourceVerdict>) -> Option<SourceVerdict> {
    let mut best: Option<SourceVerdict> = None;
    for verdict in contributing {
        let better = best
            .as_ref()
            .map_or(true, |b| verdict.confidence.weight() > b.confidence.weight());
        if better {
            best = Some(verdict);
        }
    }
    best
}

fn dedup_sources(contributing: &[SourceVerdict]) -> Vec<String> {
    let mut sources: Vec<String> = Vec::with_capacity(contributing.len());
    for verdict in contributing {
        if !sources.contains(&verdict.source_name) {
            sources.push(verdict.source_name.clone());
        }
    }
    sources
}

#[cfg(test)]
mod tests {
    use super::*;
    use heirloom_nullables::NullSource;
    use heirloom_types::{Timestamp, VerificationRecord};

    fn record(id: &str, tier: ConfidenceTier) -> VerificationRecord {
        VerificationRecord::new(
            "John Doe",
            "1950-01-01",
            "2024-03-15",
            None,
            "US",
            tier,
            id,
            Timestamp::new(1_700_000_000),
        )
    }

    fn hit(source: &str, tier: ConfidenceTier) -> SourceVerdict {
        SourceVerdict::matched(source, record(&format!("{source}-1"), tier))
    }

    fn query() -> VerificationQuery {
        VerificationQuery::new("John Doe", "1950-01-01", "US")
    }

    // ── combine ─────────────────────────────────────────────────────────

    #[test]
    fn all_failures_yield_unverified_low() {
        let verdict = combine(vec![
            SourceVerdict::failed("SSDI", "down"),
            SourceVerdict::failed("GovernmentRegistry", "down"),
            SourceVerdict::failed("News", "down"),
        ]);
        assert!(!verdict.is_verified);
        assert!(verdict.record.is_none());
        assert!(verdict.sources.is_empty());
        assert_eq!(verdict.confidence, ConfidenceTier::Low);
        assert_eq!(verdict.error.as_deref(), Some(NO_MATCH));
    }

    #[test]
    fn single_match_is_returned_verbatim() {
        let ssdi = hit("SSDI", ConfidenceTier::High);
        let verdict = combine(vec![
            ssdi.clone(),
            SourceVerdict::not_found("GovernmentRegistry"),
            SourceVerdict::failed("News", "timeout"),
        ]);
        assert!(verdict.is_verified);
        assert_eq!(verdict.record, ssdi.data);
        assert_eq!(verdict.sources, vec!["SSDI".to_string()]);
        assert_eq!(verdict.confidence, ConfidenceTier::High);
    }

    #[test]
    fn single_news_match_keeps_medium() {
        let verdict = combine(vec![hit("News", ConfidenceTier::Medium)]);
        assert_eq!(verdict.confidence, ConfidenceTier::Medium);
    }

    #[test]
    fn ssdi_and_news_give_medium_with_ssdi_record() {
        let verdict = combine(vec![
            hit("SSDI", ConfidenceTier::High),
            SourceVerdict::not_found("GovernmentRegistry"),
            hit("News", ConfidenceTier::Medium),
        ]);
        assert!(verdict.is_verified);
        assert_eq!(verdict.confidence, ConfidenceTier::Medium);
        assert_eq!(verdict.record.unwrap().verification_id(), "SSDI-1");
        assert_eq!(verdict.sources, vec!["SSDI".to_string(), "News".to_string()]);
    }

    #[test]
    fn two_high_matches_give_high() {
        let verdict = combine(vec![
            hit("SSDI", ConfidenceTier::High),
            hit("GovernmentRegistry", ConfidenceTier::High),
        ]);
        assert_eq!(verdict.confidence, ConfidenceTier::High);
        assert_eq!(verdict.record.unwrap().verification_id(), "SSDI-1");
    }

    #[test]
    fn equal_tiers_prefer_earlier_source() {
        let verdict = combine(vec![
            hit("GovernmentRegistry", ConfidenceTier::High),
            hit("SSDI", ConfidenceTier::High),
        ]);
        assert_eq!(
            verdict.record.unwrap().verification_id(),
            "GovernmentRegistry-1"
        );
    }

    #[test]
    fn higher_tier_beats_earlier_position() {
        let verdict = combine(vec![
            hit("News", ConfidenceTier::Medium),
            hit("SSDI", ConfidenceTier::High),
        ]);
        assert_eq!(verdict.record.unwrap().verification_id(), "SSDI-1");
    }

    #[test]
    fn two_medium_matches_give_medium() {
        let verdict = combine(vec![
            hit("News", ConfidenceTier::Medium),
            hit("Wire", ConfidenceTier::Medium),
        ]);
        assert_eq!(verdict.confidence, ConfidenceTier::Medium);
    }

    #[test]
    fn duplicate_source_names_are_collapsed() {
        let verdict = combine(vec![
            hit("SSDI", ConfidenceTier::High),
            hit("SSDI", ConfidenceTier::High),
            hit("News", ConfidenceTier::Medium),
        ]);
        assert_eq!(verdict.sources, vec!["SSDI".to_string(), "News".to_string()]);
    }

    #[test]
    fn match_without_record_does_not_contribute() {
        let mut broken = hit("SSDI", ConfidenceTier::High);
        broken.data = None;
        let verdict = combine(vec![broken]);
        assert!(!verdict.is_verified);
        assert!(verdict.record.is_none());
    }

    // ── fan-out ─────────────────────────────────────────────────────────

    #[tokio::test]
    async fn every_source_is_asked_once() {
        let a = Arc::new(NullSource::new(hit("SSDI", ConfidenceTier::High)));
        let b = Arc::new(NullSource::failing("GovernmentRegistry", "down"));
        let sources: Vec<Arc<dyn DeathSource>> = vec![a.clone(), b.clone()];
        let aggregator = Aggregator::new(sources);

        let verdict = aggregator.aggregate(&query()).await;

        assert!(verdict.is_verified);
        assert_eq!(a.calls(), 1);
        assert_eq!(b.calls(), 1);
    }

    #[tokio::test]
    async fn sources_run_concurrently() {
        let delay = Duration::from_millis(200);
        let sources: Vec<Arc<dyn DeathSource>> = vec![
            Arc::new(NullSource::new(hit("SSDI", ConfidenceTier::High)).with_delay(delay)),
            Arc::new(
                NullSource::new(hit("GovernmentRegistry", ConfidenceTier::High)).with_delay(delay),
            ),
            Arc::new(NullSource::new(hit("News", ConfidenceTier::Medium)).with_delay(delay)),
        ];
        let aggregator = Aggregator::new(sources);

        let started = Instant::now();
        let verdict = aggregator.aggregate(&query()).await;

        assert!(started.elapsed() < Duration::from_millis(550));
        assert_eq!(verdict.confidence, ConfidenceTier::High);
    }

    #[tokio::test]
    async fn panicking_source_becomes_failed_verdict() {
        let sources: Vec<Arc<dyn DeathSource>> = vec![
            Arc::new(NullSource::panicking("SSDI")),
            Arc::new(NullSource::new(hit("News", ConfidenceTier::Medium))),
        ];
        let aggregator = Aggregator::new(sources);

        let outcomes = aggregator.fan_out(&query()).await;
        assert_eq!(outcomes[0].verdict.source_name, "SSDI");
        assert!(!outcomes[0].verdict.is_verified);
        assert!(outcomes[0].verdict.error.is_some());

        let verdict = aggregator.aggregate(&query()).await;
        assert_eq!(verdict.sources, vec!["News".to_string()]);
    }

    #[tokio::test]
    async fn hung_source_is_cut_off_by_timeout() {
        let sources: Vec<Arc<dyn DeathSource>> = vec![
            Arc::new(
                NullSource::new(hit("SSDI", ConfidenceTier::High))
                    .with_delay(Duration::from_secs(30)),
            ),
            Arc::new(NullSource::new(hit("News", ConfidenceTier::Medium))),
        ];
        let aggregator =
            Aggregator::new(sources).with_source_timeout(Duration::from_millis(100));

        let started = Instant::now();
        let outcomes = aggregator.fan_out(&query()).await;

        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(!outcomes[0].verdict.is_verified);
        assert!(outcomes[0].verdict.error.as_ref().unwrap().contains("no answer"));
        assert!(outcomes[1].verdict.is_verified);
    }

    #[tokio::test]
    async fn outcomes_follow_priority_order() {
        let sources: Vec<Arc<dyn DeathSource>> = vec![
            Arc::new(
                NullSource::new(hit("SSDI", ConfidenceTier::High))
                    .with_delay(Duration::from_millis(100)),
            ),
            Arc::new(NullSource::new(hit("News", ConfidenceTier::Medium))),
        ];
        let aggregator = Aggregator::new(sources);
        let names: Vec<String> = aggregator
            .fan_out(&query())
            .await
            .into_iter()
            .map(|o| o.verdict.source_name)
            .collect();
        assert_eq!(names, ["SSDI", "News"]);
        assert_eq!(aggregator.source_names(), ["SSDI", "News"]);
    }
}
