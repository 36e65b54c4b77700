//! News and obituary adapter.
//!
//! Obituaries corroborate a death but are not authoritative, so matches from
//! this source are `Medium` tier.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use heirloom_types::query::DATE_FORMAT;
use heirloom_types::{
    Clock, ConfidenceTier, SourceVerdict, VerificationQuery, VerificationRecord,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::SourceError;
use crate::transport::{join_url, Transport};
use crate::DeathSource;

pub const NEWS_SOURCE: &str = "News";

/// Days searched on either side of a claimed date of death.
pub const SEARCH_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    results: Vec<Obituary>,
}

#[derive(Debug, Deserialize)]
struct Obituary {
    name: String,
    #[serde(default)]
    date_of_death: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    id: Option<String>,
}

/// Search window `[claimed - 30d, claimed + 30d]`.
pub fn search_window(claimed: NaiveDate) -> (NaiveDate, NaiveDate) {
    let span = Duration::days(SEARCH_WINDOW_DAYS);
    (claimed - span, claimed + span)
}

/// Free-text obituary search.
pub struct NewsObituarySource {
    base_url: String,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
}

impl NewsObituarySource {
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
            clock,
        }
    }

    fn params(query: &VerificationQuery) -> Vec<(String, String)> {
        let mut params = vec![("name".to_string(), query.full_name().to_string())];
        if let Some(claimed) = query.claimed_death_date() {
            let (from, to) = search_window(claimed);
            params.push(("from".to_string(), from.format(DATE_FORMAT).to_string()));
            params.push(("to".to_string(), to.format(DATE_FORMAT).to_string()));
        }
        if let Some(location) = query.last_known_location() {
            params.push(("location".to_string(), location.to_string()));
        }
        params
    }

    async fn lookup(
        &self,
        query: &VerificationQuery,
    ) -> Result<Option<VerificationRecord>, SourceError> {
        let body = self
            .transport
            .get_json(&join_url(&self.base_url, "obituaries"), &Self::params(query))
            .await?;
        let response: NewsResponse = serde_json::from_value(body)
            .map_err(|e| SourceError::InvalidResponse(format!("news response: {e}")))?;

        // An obituary without a date is only usable when the caller claimed one.
        let hit = response.results.into_iter().find_map(|obit| {
            if !same_name(&obit.name, query.full_name()) {
                return None;
            }
            let date_of_death = obit
                .date_of_death
                .or_else(|| query.claimed_date_of_death().map(str::to_string))?;
            Some((obit.id, date_of_death, obit.location))
        });

        let Some((id, date_of_death, location)) = hit else {
            return Ok(None);
        };
        let issued_at = self.clock.now();
        Ok(Some(VerificationRecord::new(
            query.full_name(),
            query.date_of_birth(),
            date_of_death,
            location,
            query.country(),
            ConfidenceTier::Medium,
            id.unwrap_or_else(|| format!("NEWS-{}", issued_at.as_secs())),
            issued_at,
        )))
    }
}

#[async_trait]
impl DeathSource for NewsObituarySource {
    fn name(&self) -> &str {
        NEWS_SOURCE
    }

    async fn probe(&self, query: &VerificationQuery) -> SourceVerdict {
        match self.lookup(query).await {
            Ok(Some(record)) => SourceVerdict::matched(NEWS_SOURCE, record),
            Ok(None) => SourceVerdict::not_found(NEWS_SOURCE),
            Err(e) => {
                tracing::warn!(source = NEWS_SOURCE, error = %e, "obituary search failed");
                SourceVerdict::failed(NEWS_SOURCE, e)
            }
        }
    }
}

/// Case-insensitive name comparison that ignores runs of whitespace.
fn same_name(a: &str, b: &str) -> bool {
    a.split_whitespace()
        .map(str::to_lowercase)
        .eq(b.split_whitespace().map(str::to_lowercase))
}
