//! Bootstrap specification and identity.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{BootstrapError, Result};
use crate::manifest;
use crate::step::BootstrapStep;

/// Where the install step takes its package list from.
///
/// The two legacy script variants differ only here, so they are two
/// configurations of one spec rather than two code paths.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DependencySource {
    /// Read `<dir>/<job_name>.txt` at install time.
    JobManifest { dir: PathBuf, job_name: String },

    /// A literal package list; no manifest file is read.
    Inline { packages: Vec<String> },
}

impl DependencySource {
    /// Resolve the source into the ordered package list.
    ///
    /// Manifest reading happens here, at install time, so a missing manifest
    /// fails the install step and not any earlier one.
    pub fn resolve(&self) -> Result<Vec<String>> {
        match self {
            DependencySource::JobManifest { dir, job_name } => {
                manifest::read_manifest(&manifest::manifest_path(dir, job_name))
            }
            DependencySource::Inline { packages } => Ok(packages.clone()),
        }
    }

    /// Short description for logs and reports.
    pub fn describe(&self) -> String {
        match self {
            DependencySource::JobManifest { dir, job_name } => {
                format!("manifest {}", manifest::manifest_path(dir, job_name).display())
            }
            DependencySource::Inline { packages } => {
                format!("inline list ({} packages)", packages.len())
            }
        }
    }
}

/// Validated inputs of one bootstrap run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BootstrapSpec {
    /// Name of the environment to create.
    pub env_name: String,

    /// Interpreter version the environment is pinned to.
    pub runtime_version: String,

    /// Channel appended to the manager's channel list.
    pub channel: String,

    /// Where the install step takes its packages from.
    pub source: DependencySource,

    /// Per-operation timeout in seconds (0 = no timeout).
    pub timeout_secs: u64,

    /// SHA-256 digest of the ordered step names (deterministic run identity).
    pub steps_digest: String,
}

impl BootstrapSpec {
    /// Build and validate a spec.
    ///
    /// Empty names and versions are rejected here so a blank
    /// `TARGET_RUNTIME_VERSION` can never silently default. Non-empty but
    /// malformed versions pass through; the environment manager is the
    /// authority on version syntax.
    pub fn new(
        env_name: impl Into<String>,
        runtime_version: impl Into<String>,
        channel: impl Into<String>,
        source: DependencySource,
        timeout_secs: u64,
    ) -> Result<Self> {
        let env_name = env_name.into();
        let runtime_version = runtime_version.into();
        let channel = channel.into();

        if env_name.trim().is_empty() {
            return Err(BootstrapError::InvalidSpec(
                "environment name must not be empty".to_string(),
            ));
        }
        if runtime_version.trim().is_empty() {
            return Err(BootstrapError::InvalidSpec(
                "runtime version must not be empty (set TARGET_RUNTIME_VERSION)".to_string(),
            ));
        }
        if channel.trim().is_empty() {
            return Err(BootstrapError::InvalidSpec(
                "channel must not be empty".to_string(),
            ));
        }
        if let DependencySource::Inline { packages } = &source {
            if packages.is_empty() {
                return Err(BootstrapError::InvalidSpec(
                    "inline package list must not be empty".to_string(),
                ));
            }
        }

        let steps_digest = compute_steps_digest(&BootstrapStep::ALL);
        Ok(Self {
            env_name,
            runtime_version,
            channel,
            source,
            timeout_secs,
            steps_digest,
        })
    }
}

/// Compute a deterministic digest of ordered step names.
fn compute_steps_digest(steps: &[BootstrapStep]) -> String {
    let mut hasher = Sha256::new();
    for step in steps {
        hasher.update(step.name().as_bytes());
        hasher.update(b"\0");
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn inline_source() -> DependencySource {
        DependencySource::Inline {
            packages: vec!["numpy".to_string()],
        }
    }

    #[test]
    fn test_spec_new() {
        let spec = BootstrapSpec::new("test-environment", "3.11", "conda-forge", inline_source(), 600)
            .expect("spec should validate");

        assert_eq!(spec.env_name, "test-environment");
        assert_eq!(spec.runtime_version, "3.11");
        assert_eq!(spec.channel, "conda-forge");
        assert!(!spec.steps_digest.is_empty());
    }

    #[test]
    fn test_empty_runtime_version_rejected() {
        let err = BootstrapSpec::new("env", "", "conda-forge", inline_source(), 600).unwrap_err();
        assert!(matches!(err, BootstrapError::InvalidSpec(_)));
        assert!(err.to_string().contains("TARGET_RUNTIME_VERSION"));
    }

    #[test]
    fn test_whitespace_runtime_version_rejected() {
        let err = BootstrapSpec::new("env", "   ", "conda-forge", inline_source(), 600).unwrap_err();
        assert!(matches!(err, BootstrapError::InvalidSpec(_)));
    }

    #[test]
    fn test_malformed_but_nonempty_version_passes_through() {
        // The environment manager is the authority on version syntax.
        let spec = BootstrapSpec::new("env", "not-a-version", "conda-forge", inline_source(), 600);
        assert!(spec.is_ok());
    }

    #[test]
    fn test_empty_inline_list_rejected() {
        let err = BootstrapSpec::new(
            "env",
            "3.11",
            "conda-forge",
            DependencySource::Inline { packages: vec![] },
            600,
        )
        .unwrap_err();
        assert!(matches!(err, BootstrapError::InvalidSpec(_)));
    }

    #[test]
    fn test_steps_digest_deterministic() {
        let a = compute_steps_digest(&BootstrapStep::ALL);
        let b = compute_steps_digest(&BootstrapStep::ALL);
        assert_eq!(a, b);
    }

    #[test]
    fn test_steps_digest_order_sensitive() {
        let reversed = [
            BootstrapStep::InstallDependencies,
            BootstrapStep::ActivateEnvironment,
            BootstrapStep::CreateEnvironment,
            BootstrapStep::RegisterChannel,
        ];
        assert_ne!(
            compute_steps_digest(&BootstrapStep::ALL),
            compute_steps_digest(&reversed)
        );
    }

    #[test]
    fn test_inline_source_resolves_without_fs() {
        let source = DependencySource::Inline {
            packages: vec!["numpy".to_string(), "mock".to_string()],
        };
        let packages = source.resolve().unwrap();
        assert_eq!(packages, vec!["numpy", "mock"]);
    }

    #[test]
    fn test_manifest_source_describe_names_path() {
        let source = DependencySource::JobManifest {
            dir: Path::new("ci").to_path_buf(),
            job_name: "py311".to_string(),
        };
        assert!(source.describe().contains("py311.txt"));
    }
}
