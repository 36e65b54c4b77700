//! SSDI adapter.

use async_trait::async_trait;
use heirloom_types::{
    Clock, ConfidenceTier, SourceVerdict, VerificationQuery, VerificationRecord,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::SourceError;
use crate::transport::{join_url, Transport};
use crate::DeathSource;

pub const SSDI_SOURCE: &str = "SSDI";

/// `GET {base}/search` response.
#[derive(Debug, Deserialize)]
struct SsdiResponse {
    deceased: bool,
    #[serde(default)]
    date_of_death: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    record_id: Option<String>,
}

/// Social Security Death Index search.
pub struct SsdiSource {
    base_url: String,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
}

impl SsdiSource {
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

    async fn lookup(
        &self,
        query: &VerificationQuery,
    ) -> Result<Option<VerificationRecord>, SourceError> {
        let (first, last) = query.first_and_last().ok_or_else(|| {
            SourceError::InvalidInput("SSDI search needs a first and last name".into())
        })?;

        let mut params = vec![
            ("first_name".to_string(), first.to_string()),
            ("last_name".to_string(), last.to_string()),
            ("date_of_birth".to_string(), query.date_of_birth().to_string()),
        ];
        if let Some(id) = query.national_id() {
            params.push(("national_id".to_string(), id.to_string()));
        }

        let body = self
            .transport
            .get_json(&join_url(&self.base_url, "search"), &params)
            .await?;
        let response: SsdiResponse = serde_json::from_value(body)
            .map_err(|e| SourceError::InvalidResponse(format!("SSDI response: {e}")))?;

        if !response.deceased {
            return Ok(None);
        }
        let date_of_death = response.date_of_death.ok_or_else(|| {
            SourceError::InvalidResponse("SSDI reported deceased without a date of death".into())
        })?;

        let issued_at = self.clock.now();
        let verification_id = response
            .record_id
            .unwrap_or_else(|| format!("SSDI-{}", issued_at.as_secs()));
        Ok(Some(VerificationRecord::new(
            query.full_name(),
            query.date_of_birth(),
            date_of_death,
            response.location,
            query.country(),
            ConfidenceTier::High,
            verification_id,
            issued_at,
        )))
    }
}

#[async_trait]
impl DeathSource for SsdiSource {
    fn name(&self) -> &str {
        SSDI_SOURCE
    }

    async fn probe(&self, query: &VerificationQuery) -> SourceVerdict {
        match self.lookup(query).await {
            Ok(Some(record)) => SourceVerdict::matched(SSDI_SOURCE, record),
            Ok(None) => SourceVerdict::not_found(SSDI_SOURCE),
            Err(e) => {
                tracing::warn!(source = SSDI_SOURCE, error = %e, "SSDI lookup failed");
                SourceVerdict::failed(SSDI_SOURCE, e)
            }
        }
    }
}
