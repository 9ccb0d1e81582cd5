//! The conda driver: maps bootstrap operations onto conda CLI invocations.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use envstrap_core::driver::{
    bin_dir_for_prefix, ActivationEnv, DriverError, DriverResult, EnvironmentDriver,
};

use crate::binary::locate_conda;
use crate::error::CondaError;
use crate::info::CondaInfo;
use crate::Result;

/// Output of one conda invocation.
#[derive(Debug)]
pub struct CondaOutput {
    pub stdout: Vec<u8>,
    pub stderr: String,
}

/// Driver for a conda-compatible CLI.
///
/// All four bootstrap operations shell out to the same executable; argv
/// construction is separated from execution so the command shapes stay
/// unit-testable without a conda installation.
#[derive(Debug, Clone)]
pub struct CondaDriver {
    exe: PathBuf,
    quiet: bool,
    timeout_secs: u64,
}

impl CondaDriver {
    /// Driver for a known conda executable. Quiet by default; no timeout.
    pub fn new(exe: PathBuf) -> Self {
        Self {
            exe,
            quiet: true,
            timeout_secs: 0,
        }
    }

    /// Locate conda (via `CONDA_EXE` or PATH) and build a driver for it.
    pub fn from_path() -> Result<Self> {
        Ok(Self::new(locate_conda()?))
    }

    /// Set the per-operation timeout (0 = none).
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Pass `--quiet` to conda (the default) or let it print progress bars.
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// `conda config --append channels <channel>` — appended after existing
    /// channels, so the new channel has lower priority.
    fn channel_args(&self, channel: &str) -> Vec<String> {
        vec![
            "config".to_string(),
            "--append".to_string(),
            "channels".to_string(),
            channel.to_string(),
        ]
    }

    /// `conda create [-q] -y -n <env> python=<version>`
    fn create_args(&self, env_name: &str, runtime_version: &str) -> Vec<String> {
        let mut args = vec!["create".to_string()];
        if self.quiet {
            args.push("--quiet".to_string());
        }
        args.push("--yes".to_string());
        args.push("--name".to_string());
        args.push(env_name.to_string());
        args.push(format!("python={runtime_version}"));
        args
    }

    /// `conda install [-q] -y -n <env> <packages…>`
    fn install_args(&self, env_name: &str, packages: &[String]) -> Vec<String> {
        let mut args = vec!["install".to_string()];
        if self.quiet {
            args.push("--quiet".to_string());
        }
        args.push("--yes".to_string());
        args.push("--name".to_string());
        args.push(env_name.to_string());
        args.extend(packages.iter().cloned());
        args
    }

    /// `conda info --json`
    fn info_args(&self) -> Vec<String> {
        vec!["info".to_string(), "--json".to_string()]
    }

    /// Execute one conda invocation, optionally under an activation overlay.
    async fn run(
        &self,
        operation: &str,
        args: &[String],
        overlay: Option<&ActivationEnv>,
    ) -> Result<CondaOutput> {
        debug!(operation, exe = %self.exe.display(), ?args, "Invoking conda");

        let mut command = Command::new(&self.exe);
        command.args(args).stdout(Stdio::piped()).stderr(Stdio::piped());
        if let Some(overlay) = overlay {
            command.envs(overlay.vars().iter().cloned());
        }

        let child = command.spawn()?;
        let output = if self.timeout_secs > 0 {
            tokio::time::timeout(
                std::time::Duration::from_secs(self.timeout_secs),
                child.wait_with_output(),
            )
            .await
            .map_err(|_| CondaError::Timeout {
                operation: operation.to_string(),
                secs: self.timeout_secs,
            })??
        } else {
            child.wait_with_output().await?
        };

        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        if !output.status.success() {
            return Err(CondaError::CommandFailed {
                operation: operation.to_string(),
                exit_code: output.status.code().unwrap_or(-1),
                stderr,
            });
        }

        Ok(CondaOutput {
            stdout: output.stdout,
            stderr,
        })
    }

    /// Query `conda info --json` and resolve the named environment.
    async fn resolve_env_prefix(&self, operation: &str, env_name: &str) -> Result<PathBuf> {
        let output = self.run(operation, &self.info_args(), None).await?;
        let conda_info = CondaInfo::parse(&output.stdout)?;
        conda_info
            .env_prefix(env_name)
            .ok_or_else(|| CondaError::EnvironmentNotFound(env_name.to_string()))
    }
}

/// Build the activation overlay for an environment prefix.
///
/// Equivalent to what `source activate <env>` exports: the environment's
/// binary directory prepended to PATH, plus `CONDA_PREFIX` and
/// `CONDA_DEFAULT_ENV`.
fn activation_overlay(env_name: &str, prefix: &Path, current_path: Option<&str>) -> ActivationEnv {
    let bin_dir = bin_dir_for_prefix(prefix);
    let path_value = match current_path {
        Some(existing) if !existing.is_empty() => {
            let sep = if cfg!(windows) { ';' } else { ':' };
            format!("{}{}{}", bin_dir.display(), sep, existing)
        }
        _ => bin_dir.display().to_string(),
    };

    let vars = vec![
        ("PATH".to_string(), path_value),
        ("CONDA_PREFIX".to_string(), prefix.display().to_string()),
        ("CONDA_DEFAULT_ENV".to_string(), env_name.to_string()),
    ];
    ActivationEnv::new(env_name, prefix.to_path_buf(), vars)
}

/// Map a conda failure to a driver error, keeping the exit code.
fn to_driver_error(operation: &str, err: CondaError) -> DriverError {
    let driver_err = DriverError::new(operation, err.to_string());
    match err.exit_code() {
        Some(code) => driver_err.with_exit_code(code),
        None => driver_err,
    }
}

#[async_trait]
impl EnvironmentDriver for CondaDriver {
    async fn register_channel(&self, channel: &str) -> DriverResult<()> {
        let operation = "register_channel";
        info!(channel, "Appending package channel");
        self.run(operation, &self.channel_args(channel), None)
            .await
            .map_err(|e| to_driver_error(operation, e))?;
        Ok(())
    }

    async fn create_environment(&self, env_name: &str, runtime_version: &str) -> DriverResult<()> {
        let operation = "create_environment";
        info!(env_name, runtime_version, "Creating environment");
        self.run(operation, &self.create_args(env_name, runtime_version), None)
            .await
            .map_err(|e| to_driver_error(operation, e))?;
        Ok(())
    }

    async fn activate(&self, env_name: &str) -> DriverResult<ActivationEnv> {
        let operation = "activate_environment";
        let prefix = self
            .resolve_env_prefix(operation, env_name)
            .await
            .map_err(|e| to_driver_error(operation, e))?;

        let current_path = std::env::var("PATH").ok();
        let overlay = activation_overlay(env_name, &prefix, current_path.as_deref());
        info!(env_name, prefix = %prefix.display(), "Activated environment");
        Ok(overlay)
    }

    async fn install(
        &self,
        env_name: &str,
        activation: &ActivationEnv,
        packages: &[String],
    ) -> DriverResult<()> {
        let operation = "install_dependencies";
        info!(env_name, count = packages.len(), "Installing dependencies");
        self.run(operation, &self.install_args(env_name, packages), Some(activation))
            .await
            .map_err(|e| to_driver_error(operation, e))?;
        Ok(())
    }
}
