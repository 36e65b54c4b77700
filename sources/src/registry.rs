//! Government death registry adapter.

use async_trait::async_trait;
use heirloom_types::{
    Clock, ConfidenceTier, SourceVerdict, VerificationQuery, VerificationRecord,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::SourceError;
use crate::transport::{join_url, Transport};
use crate::DeathSource;

pub const REGISTRY_SOURCE: &str = "GovernmentRegistry";

/// `GET {endpoint}/deaths` response.
#[derive(Debug, Deserialize)]
struct RegistryResponse {
    deceased: bool,
    #[serde(default)]
    date_of_death: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    certificate_id: Option<String>,
}

/// Civil death registries, one endpoint per country.
///
/// Countries without a configured endpoint are answered locally with a
/// configuration error; no request is made.
pub struct GovernmentRegistrySource {
    registries: BTreeMap<String, String>,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
}

impl GovernmentRegistrySource {
    pub fn new(
        registries: BTreeMap<String, String>,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let registries = registries
            .into_iter()
            .map(|(country, url)| (country.trim().to_uppercase(), url))
            .collect();
        Self {
            registries,
            transport,
            clock,
        }
    }

    fn endpoint_for(&self, country: &str) -> Result<&str, SourceError> {
        self.registries
            .get(country)
            .map(String::as_str)
            .ok_or_else(|| SourceError::UnmappedCountry(country.to_string()))
    }

    async fn lookup(
        &self,
        query: &VerificationQuery,
    ) -> Result<Option<VerificationRecord>, SourceError> {
        let endpoint = self.endpoint_for(query.country())?;

        let mut params = vec![
            ("full_name".to_string(), query.full_name().to_string()),
            ("date_of_birth".to_string(), query.date_of_birth().to_string()),
        ];
        if let Some(id) = query.national_id() {
            params.push(("national_id".to_string(), id.to_string()));
        }

        let body = self
            .transport
            .get_json(&join_url(endpoint, "deaths"), &params)
            .await?;
        let response: RegistryResponse = serde_json::from_value(body)
            .map_err(|e| SourceError::InvalidResponse(format!("registry response: {e}")))?;

        if !response.deceased {
            return Ok(None);
        }
        let date_of_death = response.date_of_death.ok_or_else(|| {
            SourceError::InvalidResponse(
                "registry reported deceased without a date of death".into(),
            )
        })?;

        let issued_at = self.clock.now();
        let verification_id = response
            .certificate_id
            .unwrap_or_else(|| format!("GOV-{}-{}", query.country(), issued_at.as_secs()));
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
impl DeathSource for GovernmentRegistrySource {
    fn name(&self) -> &str {
        REGISTRY_SOURCE
    }

    async fn probe(&self, query: &VerificationQuery) -> SourceVerdict {
        match self.lookup(query).await {
            Ok(Some(record)) => SourceVerdict::matched(REGISTRY_SOURCE, record),
            Ok(None) => SourceVerdict::not_found(REGISTRY_SOURCE),
            Err(e @ SourceError::UnmappedCountry(_)) => {
                tracing::debug!(country = query.country(), "no registry for country");
                SourceVerdict::failed(REGISTRY_SOURCE, e)
            }
            Err(e) => {
                tracing::warn!(source = REGISTRY_SOURCE, error = %e, "registry lookup failed");
                SourceVerdict::failed(REGISTRY_SOURCE, e)
            }
        }
    }
}
