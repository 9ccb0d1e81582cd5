//! Bootstrap step definitions.

use serde::{Deserialize, Serialize};

use crate::phase::BootstrapPhase;

/// The four bootstrap steps, in execution order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BootstrapStep {
    /// Append the package channel after existing channels (lower priority).
    RegisterChannel,

    /// Create the named environment pinned to the requested runtime version.
    CreateEnvironment,

    /// Compute the activation overlay for the new environment.
    ActivateEnvironment,

    /// Install the job's dependencies into the active environment.
    InstallDependencies,
}

impl BootstrapStep {
    /// Fixed execution order. The pipeline never skips or reorders steps.
    pub const ALL: [BootstrapStep; 4] = [
        BootstrapStep::RegisterChannel,
        BootstrapStep::CreateEnvironment,
        BootstrapStep::ActivateEnvironment,
        BootstrapStep::InstallDependencies,
    ];

    /// Step name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            BootstrapStep::RegisterChannel => "register_channel",
            BootstrapStep::CreateEnvironment => "create_environment",
            BootstrapStep::ActivateEnvironment => "activate_environment",
            BootstrapStep::InstallDependencies => "install_dependencies",
        }
    }

    /// The phase a run reaches when this step succeeds.
    pub fn completes(&self) -> BootstrapPhase {
        match self {
            BootstrapStep::RegisterChannel => BootstrapPhase::ChannelRegistered,
            BootstrapStep::CreateEnvironment => BootstrapPhase::EnvironmentCreated,
            BootstrapStep::ActivateEnvironment => BootstrapPhase::EnvironmentActive,
            BootstrapStep::InstallDependencies => BootstrapPhase::DependenciesInstalled,
        }
    }
}

impl std::fmt::Display for BootstrapStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
