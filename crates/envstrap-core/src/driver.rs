//! Environment-driver seam.
//!
//! The pipeline talks to the environment manager through the
//! [`EnvironmentDriver`] trait: four operations matching the four bootstrap
//! steps. `conda-env-manager` provides the production implementation;
//! [`crate::fakes::MemoryDriver`] satisfies the contract in tests.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// Failure of a single environment-manager operation.
///
/// Carries the failing external command's exit code when one exists, so it
/// can be propagated as the process exit code.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{operation} failed: {message}")]
pub struct DriverError {
    /// Name of the operation that failed (matches the step name).
    pub operation: String,

    /// Human-readable failure description, usually the tool's stderr.
    pub message: String,

    /// Exit code of the failing external command, if it ran at all.
    pub exit_code: Option<i32>,
}

impl DriverError {
    /// Create an error with no exit code (spawn failure, timeout, bad output).
    pub fn new(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            message: message.into(),
            exit_code: None,
        }
    }

    /// Attach the external command's exit code.
    pub fn with_exit_code(mut self, exit_code: i32) -> Self {
        self.exit_code = Some(exit_code);
        self
    }
}

/// Result type for driver operations.
pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// Environment-variable overlay equivalent to activating the environment.
///
/// A child process cannot mutate its parent shell, so activation is modeled
/// as a value: the variables that `source activate <env>` would have set.
/// The install step runs under this overlay.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ActivationEnv {
    /// Name of the activated environment.
    pub env_name: String,

    /// Root prefix of the activated environment.
    pub prefix: PathBuf,

    vars: Vec<(String, String)>,
}

impl ActivationEnv {
    /// Build an overlay for an environment rooted at `prefix`.
    ///
    /// `vars` must already include the PATH prepend and any manager-specific
    /// variables; the overlay itself is manager-agnostic.
    pub fn new(env_name: impl Into<String>, prefix: PathBuf, vars: Vec<(String, String)>) -> Self {
        Self {
            env_name: env_name.into(),
            prefix,
            vars,
        }
    }

    /// The variables to apply, in application order.
    pub fn vars(&self) -> &[(String, String)] {
        &self.vars
    }

    /// Look up a single overlay variable.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The environment's binary directory under the prefix.
    pub fn bin_dir(&self) -> PathBuf {
        bin_dir_for_prefix(&self.prefix)
    }
}

/// Platform-specific binary directory for an environment prefix.
pub fn bin_dir_for_prefix(prefix: &Path) -> PathBuf {
    if cfg!(windows) {
        prefix.join("Scripts")
    } else {
        prefix.join("bin")
    }
}

/// Operations the pipeline needs from an environment manager.
///
/// Implementations block (await) until the underlying tool completes; the
/// pipeline serializes calls, so no operation overlaps another.
#[async_trait]
pub trait EnvironmentDriver: Send + Sync {
    /// Append a package channel after existing channels (lower priority).
    async fn register_channel(&self, channel: &str) -> DriverResult<()>;

    /// Create a named environment pinned to the requested runtime version.
    async fn create_environment(&self, env_name: &str, runtime_version: &str) -> DriverResult<()>;

    /// Resolve the environment and compute its activation overlay.
    async fn activate(&self, env_name: &str) -> DriverResult<ActivationEnv>;

    /// Install packages into the environment, running under the overlay.
    async fn install(
        &self,
        env_name: &str,
        activation: &ActivationEnv,
        packages: &[String],
    ) -> DriverResult<()>;
}
