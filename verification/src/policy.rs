//! Environment policy: real sources or mock data, decided once per process.

use heirloom_types::DeploymentStage;

/// Whether this process talks to real sources.
///
/// Development and staging never call real sources.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnvironmentPolicy {
    stage: DeploymentStage,
}

impl EnvironmentPolicy {
    pub fn new(stage: DeploymentStage) -> Self {
        Self { stage }
    }

    pub fn stage(&self) -> DeploymentStage {
        self.stage
    }

    pub fn should_use_mock(&self) -> bool {
        match self.stage {
            DeploymentStage::Development | DeploymentStage::Staging => true,
            DeploymentStage::Production => false,
        }
    }
}
