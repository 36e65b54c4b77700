//! Death-record source adapters.
//!
//! Each adapter wraps one external data source behind the [`DeathSource`]
//! contract and normalizes its answer into a [`SourceVerdict`]:
//! - **SSDI**: social-security death index search (`High` tier)
//! - **Government registry**: per-country civil death registries (`High` tier)
//! - **News/obituary**: published obituaries, corroborating only (`Medium` tier)
//!
//! Adapters never return errors. Transport and lookup failures are absorbed at
//! the adapter boundary and reported as unverified, low-confidence verdicts.

pub mod endpoints;
pub mod error;
pub mod news;
pub mod registry;
pub mod ssdi;
pub mod transport;

pub use endpoints::SourceEndpoints;
pub use error::SourceError;
pub use news::NewsObituarySource;
pub use registry::GovernmentRegistrySource;
pub use ssdi::SsdiSource;
pub use transport::{HttpTransport, Transport};

use async_trait::async_trait;
use heirloom_types::{Clock, SourceVerdict, VerificationQuery};
use std::sync::Arc;

/// A single external death-data source.
#[async_trait]
pub trait DeathSource: Send + Sync {
    /// Name reported in verdicts and health reports.
    fn name(&self) -> &str;

    /// Ask the source whether the queried person is deceased.
    async fn probe(&self, query: &VerificationQuery) -> SourceVerdict;
}

/// The standard adapters in priority order: SSDI, government registry, news.
pub fn default_sources(
    endpoints: &SourceEndpoints,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
) -> Vec<Arc<dyn DeathSource>> {
    vec![
        Arc::new(SsdiSource::new(
            endpoints.ssdi_url.clone(),
            transport.clone(),
            clock.clone(),
        )),
        Arc::new(GovernmentRegistrySource::new(
            endpoints.registries.clone(),
            transport.clone(),
            clock.clone(),
        )),
        Arc::new(NewsObituarySource::new(
            endpoints.news_url.clone(),
            transport,
            clock,
        )),
    ]
}
