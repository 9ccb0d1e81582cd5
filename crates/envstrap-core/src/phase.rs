//! Bootstrap run phases.
//!
//! A run moves through a fixed linear sequence; no phase is skipped,
//! reordered or revisited. Failure halts progression permanently for
//! that run.

use serde::{Deserialize, Serialize};

/// Phase reached by a bootstrap run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BootstrapPhase {
    /// No step has completed yet.
    Unconfigured,

    /// The package channel has been appended.
    ChannelRegistered,

    /// The named environment exists, pinned to the requested runtime.
    EnvironmentCreated,

    /// The activation overlay has been computed.
    EnvironmentActive,

    /// All requested packages are installed.
    DependenciesInstalled,
}

impl BootstrapPhase {
    /// Phase name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            BootstrapPhase::Unconfigured => "unconfigured",
            BootstrapPhase::ChannelRegistered => "channel_registered",
            BootstrapPhase::EnvironmentCreated => "environment_created",
            BootstrapPhase::EnvironmentActive => "environment_active",
            BootstrapPhase::DependenciesInstalled => "dependencies_installed",
        }
    }

    /// Whether this is the final phase of a successful run.
    pub fn is_complete(&self) -> bool {
        matches!(self, BootstrapPhase::DependenciesInstalled)
    }
}

impl std::fmt::Display for BootstrapPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_names() {
        assert_eq!(BootstrapPhase::Unconfigured.name(), "unconfigured");
        assert_eq!(BootstrapPhase::ChannelRegistered.name(), "channel_registered");
        assert_eq!(BootstrapPhase::EnvironmentCreated.name(), "environment_created");
        assert_eq!(BootstrapPhase::EnvironmentActive.name(), "environment_active");
        assert_eq!(
            BootstrapPhase::DependenciesInstalled.name(),
            "dependencies_installed"
        );
    }

    #[test]
    fn test_phases_are_ordered() {
        assert!(BootstrapPhase::Unconfigured < BootstrapPhase::ChannelRegistered);
        assert!(BootstrapPhase::ChannelRegistered < BootstrapPhase::EnvironmentCreated);
        assert!(BootstrapPhase::EnvironmentCreated < BootstrapPhase::EnvironmentActive);
        assert!(BootstrapPhase::EnvironmentActive < BootstrapPhase::DependenciesInstalled);
    }

    #[test]
    fn test_only_final_phase_is_complete() {
        assert!(BootstrapPhase::DependenciesInstalled.is_complete());
        assert!(!BootstrapPhase::EnvironmentActive.is_complete());
        assert!(!BootstrapPhase::Unconfigured.is_complete());
    }
}
