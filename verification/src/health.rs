//! Health reporting for the degraded-mode banner.
//!
//! In real mode the probe is one full fan-out with a synthetic query, timed
//! end to end. The synthetic result is never cached.

use heirloom_types::VerificationQuery;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::aggregator::Aggregator;
use crate::cache::VerdictCache;

/// Availability of the service as a whole.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub available: bool,
    pub response_time_ms: u64,
    pub error: Option<String>,
}

/// Availability of one source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceHealth {
    pub name: String,
    pub available: bool,
    pub response_time_ms: u64,
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheHealth {
    pub available: bool,
    pub entries: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub mock_mode: bool,
    pub overall: ServiceHealth,
    pub sources: Vec<SourceHealth>,
    pub cache: CacheHealth,
}

/// The query sent by health probes.
pub fn synthetic_query() -> VerificationQuery {
    VerificationQuery::new("Health Check", "1900-01-01", "US")
}

/// Probe every source and the cache.
pub async fn check_health(
    aggregator: &Aggregator,
    cache: &dyn VerdictCache,
    mock_mode: bool,
) -> HealthReport {
    let cache = CacheHealth {
        available: true,
        entries: cache.stats().size,
    };

    if mock_mode {
        let sources = aggregator
            .source_names()
            .into_iter()
            .map(|name| SourceHealth {
                name,
                available: true,
                response_time_ms: 0,
                error: None,
            })
            .collect();
        return HealthReport {
            mock_mode,
            overall: ServiceHealth {
                available: true,
                response_time_ms: 0,
                error: None,
            },
            sources,
            cache,
        };
    }

    let started = Instant::now();
    let outcomes = aggregator.fan_out(&synthetic_query()).await;
    let total = started.elapsed();

    let sources: Vec<SourceHealth> = outcomes
        .into_iter()
        .map(|outcome| SourceHealth {
            name: outcome.verdict.source_name,
            available: outcome.verdict.error.is_none(),
            response_time_ms: millis(outcome.elapsed),
            error: outcome.verdict.error,
        })
        .collect();

    let overall = if sources.iter().any(|s| s.available) {
        ServiceHealth {
            available: true,
            response_time_ms: millis(total),
            error: None,
        }
    } else {
        let error = if sources.is_empty() {
            "no sources configured".to_string()
        } else {
            sources
                .iter()
                .map(|s| format!("{}: {}", s.name, s.error.as_deref().unwrap_or("unavailable")))
                .collect::<Vec<_>>()
                .join("; ")
        };
        tracing::warn!(%error, "all sources unavailable");
        ServiceHealth {
            available: false,
            response_time_ms: millis(total),
            error: Some(error),
        }
    };

    HealthReport {
        mock_mode,
        overall,
        sources,
        cache,
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
