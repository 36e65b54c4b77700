//! Service configuration with TOML file support.

use heirloom_sources::SourceEndpoints;
use heirloom_types::DeploymentStage;
use heirloom_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cache::DEFAULT_TTL_SECS;
use crate::error::VerificationError;
use crate::mock::DEFAULT_MATCH_PROBABILITY;

/// Configuration for a [`DeathVerificationService`](crate::DeathVerificationService).
///
/// Can be loaded from a TOML file via [`ServiceConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Deployment stage; everything but production uses mock data.
    #[serde(default)]
    pub stage: DeploymentStage,

    /// How long a cached verdict stays readable, in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Per-source answer deadline in seconds. `0` waits indefinitely.
    #[serde(default = "default_source_timeout_secs")]
    pub source_timeout_secs: u64,

    /// Chance that a demo-table name matches in mock mode, in `[0, 1]`.
    #[serde(default = "default_mock_match_probability")]
    pub mock_match_probability: f64,

    /// Seed for the mock-mode random draw. Unset draws from OS entropy.
    #[serde(default)]
    pub mock_seed: Option<u64>,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Source endpoints.
    #[serde(default)]
    pub endpoints: SourceEndpoints,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_TTL_SECS
}

fn default_source_timeout_secs() -> u64 {
    30
}

fn default_mock_match_probability() -> f64 {
    DEFAULT_MATCH_PROBABILITY
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ServiceConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, VerificationError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| VerificationError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, VerificationError> {
        let config: Self =
            toml::from_str(s).map_err(|e| VerificationError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, VerificationError> {
        toml::to_string_pretty(self).map_err(|e| VerificationError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), VerificationError> {
        if !(0.0..=1.0).contains(&self.mock_match_probability) {
            return Err(VerificationError::Config(format!(
                "mock_match_probability must be within [0, 1], got {}",
                self.mock_match_probability
            )));
        }
        if self.cache_ttl_secs == 0 {
            return Err(VerificationError::Config(
                "cache_ttl_secs must be positive".into(),
            ));
        }
        Ok(())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            stage: DeploymentStage::default(),
            cache_ttl_secs: default_cache_ttl_secs(),
            source_timeout_secs: default_source_timeout_secs(),
            mock_match_probability: default_mock_match_probability(),
            mock_seed: None,
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            endpoints: SourceEndpoints::default(),
        }
    }
}
