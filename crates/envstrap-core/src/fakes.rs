//! In-memory fake for the environment driver (testing only)
//!
//! `MemoryDriver` satisfies the [`EnvironmentDriver`] contract without a
//! conda installation: it records every call and can be scripted to fail a
//! chosen step, so pipeline tests can exercise fail-fast ordering.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::driver::{ActivationEnv, DriverError, DriverResult, EnvironmentDriver};
use crate::step::BootstrapStep;

/// One recorded driver call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCall {
    RegisterChannel {
        channel: String,
    },
    CreateEnvironment {
        env_name: String,
        runtime_version: String,
    },
    Activate {
        env_name: String,
    },
    Install {
        env_name: String,
        packages: Vec<String>,
    },
}

/// In-memory environment driver backed by a call log.
#[derive(Debug, Default)]
pub struct MemoryDriver {
    calls: Mutex<Vec<DriverCall>>,
    failures: Mutex<HashMap<BootstrapStep, DriverError>>,
    prefix_root: PathBuf,
}

impl MemoryDriver {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            prefix_root: PathBuf::from("/fake/envs"),
        }
    }

    /// Script a failure for one step.
    pub fn with_failure(self, step: BootstrapStep, error: DriverError) -> Self {
        self.failures.lock().unwrap().insert(step, error);
        self
    }

    /// Snapshot of the recorded calls, in order.
    pub fn calls(&self) -> Vec<DriverCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: DriverCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn scripted_failure(&self, step: BootstrapStep) -> Option<DriverError> {
        self.failures.lock().unwrap().get(&step).cloned()
    }
}

#[async_trait]
impl EnvironmentDriver for MemoryDriver {
    async fn register_channel(&self, channel: &str) -> DriverResult<()> {
        self.record(DriverCall::RegisterChannel {
            channel: channel.to_string(),
        });
        match self.scripted_failure(BootstrapStep::RegisterChannel) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn create_environment(&self, env_name: &str, runtime_version: &str) -> DriverResult<()> {
        self.record(DriverCall::CreateEnvironment {
            env_name: env_name.to_string(),
            runtime_version: runtime_version.to_string(),
        });
        match self.scripted_failure(BootstrapStep::CreateEnvironment) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn activate(&self, env_name: &str) -> DriverResult<ActivationEnv> {
        self.record(DriverCall::Activate {
            env_name: env_name.to_string(),
        });
        if let Some(err) = self.scripted_failure(BootstrapStep::ActivateEnvironment) {
            return Err(err);
        }
        let prefix = self.prefix_root.join(env_name);
        let vars = vec![
            ("CONDA_DEFAULT_ENV".to_string(), env_name.to_string()),
            ("CONDA_PREFIX".to_string(), prefix.display().to_string()),
        ];
        Ok(ActivationEnv::new(env_name, prefix, vars))
    }

    async fn install(
        &self,
        env_name: &str,
        _activation: &ActivationEnv,
        packages: &[String],
    ) -> DriverResult<()> {
        self.record(DriverCall::Install {
            env_name: env_name.to_string(),
            packages: packages.to_vec(),
        });
        match self.scripted_failure(BootstrapStep::InstallDependencies) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_driver_records_calls_in_order() {
        let driver = MemoryDriver::new();
        driver.register_channel("conda-forge").await.unwrap();
        let activation = driver.activate("env-a").await.unwrap();
        driver
            .install("env-a", &activation, &["numpy".to_string()])
            .await
            .unwrap();

        let calls = driver.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(
            calls[0],
            DriverCall::RegisterChannel {
                channel: "conda-forge".to_string()
            }
        );
        assert!(matches!(calls[2], DriverCall::Install { .. }));
    }

    #[tokio::test]
    async fn test_memory_driver_scripted_failure() {
        let driver = MemoryDriver::new().with_failure(
            BootstrapStep::CreateEnvironment,
            DriverError::new("create_environment", "version not found").with_exit_code(1),
        );

        let err = driver.create_environment("env-a", "9.99").await.unwrap_err();
        assert_eq!(err.exit_code, Some(1));
        // The call is still recorded; the external tool ran and failed.
        assert_eq!(driver.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_memory_driver_activation_overlay() {
        let driver = MemoryDriver::new();
        let activation = driver.activate("test-environment").await.unwrap();
        assert_eq!(activation.get("CONDA_DEFAULT_ENV"), Some("test-environment"));
        assert!(activation.prefix.ends_with("test-environment"));
    }
}
