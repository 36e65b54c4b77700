//! The verification entry point.
//!
//! `verify_death` never fails: invalid queries and unexpected faults come
//! back as unverified, low-confidence verdicts carrying the message.

use heirloom_sources::{default_sources, DeathSource, HttpTransport};
use heirloom_types::{AggregateVerdict, Clock, SystemClock, VerificationQuery};
use std::sync::Arc;
use std::time::Duration;

use crate::aggregator::Aggregator;
use crate::cache::{CacheStats, MemoryCache, VerdictCache};
use crate::config::ServiceConfig;
use crate::error::VerificationError;
use crate::health::{check_health, HealthReport};
use crate::mock::{MockVerifier, SeededRandom};
use crate::policy::EnvironmentPolicy;

/// Death verification over a fixed set of sources.
pub struct DeathVerificationService {
    policy: EnvironmentPolicy,
    aggregator: Aggregator,
    cache: Arc<dyn VerdictCache>,
    mock: MockVerifier,
}

impl DeathVerificationService {
    pub fn new(
        policy: EnvironmentPolicy,
        aggregator: Aggregator,
        cache: Arc<dyn VerdictCache>,
        mock: MockVerifier,
    ) -> Self {
        Self {
            policy,
            aggregator,
            cache,
            mock,
        }
    }

    /// Wire the standard HTTP sources, an in-memory cache and the wall clock.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, VerificationError> {
        config.validate()?;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let transport = Arc::new(HttpTransport::with_timeout(Duration::from_secs(
            config.endpoints.http_timeout_secs,
        )));
        let sources = default_sources(&config.endpoints, transport, clock.clone());
        Ok(Self::with_sources(config, sources, clock))
    }

    /// Wire caller-supplied sources (in priority order) and clock.
    pub fn with_sources(
        config: &ServiceConfig,
        sources: Vec<Arc<dyn DeathSource>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mut aggregator = Aggregator::new(sources);
        if config.source_timeout_secs > 0 {
            aggregator =
                aggregator.with_source_timeout(Duration::from_secs(config.source_timeout_secs));
        }
        let cache = Arc::new(MemoryCache::new(config.cache_ttl_secs, clock.clone()));
        let mock = MockVerifier::new(
            Arc::new(SeededRandom::new(config.mock_seed)),
            config.mock_match_probability,
            clock,
        );
        Self::new(EnvironmentPolicy::new(config.stage), aggregator, cache, mock)
    }

    pub fn policy(&self) -> EnvironmentPolicy {
        self.policy
    }

    /// Verify whether the queried person is deceased.
    pub async fn verify_death(&self, query: VerificationQuery) -> AggregateVerdict {
        match self.try_verify(&query).await {
            Ok(verdict) => verdict,
            Err(e) => {
                tracing::error!(error = %e, "verification failed");
                AggregateVerdict::unverified(e.to_string())
            }
        }
    }

    async fn try_verify(
        &self,
        query: &VerificationQuery,
    ) -> Result<AggregateVerdict, VerificationError> {
        query.validate()?;

        if self.policy.should_use_mock() {
            tracing::debug!(stage = %self.policy.stage(), "answering from mock data");
            return Ok(self.mock.verify(query));
        }

        let key = query.cache_key();
        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!(%key, "verdict cache hit");
            return Ok(cached);
        }
        tracing::debug!(%key, "verdict cache miss");

        let verdict = self.aggregator.aggregate(query).await;
        self.cache.put(&key, verdict.clone());
        tracing::info!(
            verified = verdict.is_verified,
            confidence = %verdict.confidence,
            sources = ?verdict.sources,
            "verification complete"
        );
        Ok(verdict)
    }

    /// Availability of each source and the cache.
    pub async fn check_api_health(&self) -> HealthReport {
        check_health(
            &self.aggregator,
            self.cache.as_ref(),
            self.policy.should_use_mock(),
        )
        .await
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
