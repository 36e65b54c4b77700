//! Where each source lives.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Endpoint configuration for the three sources.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEndpoints {
    /// Base URL of the SSDI-style search service.
    #[serde(default = "default_ssdi_url")]
    pub ssdi_url: String,

    /// Base URL of the news/obituary search service.
    #[serde(default = "default_news_url")]
    pub news_url: String,

    /// Per-request HTTP timeout in seconds.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Government death registries by ISO 3166-1 alpha-2 country code.
    #[serde(default = "default_registries")]
    pub registries: BTreeMap<String, String>,
}

fn default_ssdi_url() -> String {
    "https://ssdi.heirloom.example/api".to_string()
}

fn default_news_url() -> String {
    "https://obituaries.heirloom.example/api".to_string()
}

fn default_registries() -> BTreeMap<String, String> {
    [
        ("US", "https://registry-us.heirloom.example/api"),
        ("GB", "https://registry-gb.heirloom.example/api"),
        ("CA", "https://registry-ca.heirloom.example/api"),
        ("AU", "https://registry-au.heirloom.example/api"),
        ("DE", "https://registry-de.heirloom.example/api"),
        ("FR", "https://registry-fr.heirloom.example/api"),
    ]
    .into_iter()
    .map(|(country, url)| (country.to_string(), url.to_string()))
    .collect()
}

fn default_http_timeout_secs() -> u64 {
    10
}

impl Default for SourceEndpoints {
    fn default() -> Self {
        Self {
            ssdi_url: default_ssdi_url(),
            news_url: default_news_url(),
            registries: default_registries(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}
