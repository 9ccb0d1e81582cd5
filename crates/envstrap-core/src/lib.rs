//! envstrap core - CI environment bootstrap orchestration
//!
//! Provides the bootstrap pipeline that:
//! - Registers a package channel with the environment manager
//! - Creates an isolated environment pinned to an interpreter version
//! - Activates it (as an environment-variable overlay)
//! - Installs the job's dependencies, from a manifest file or an inline list
//!
//! The environment manager itself sits behind the [`driver::EnvironmentDriver`]
//! trait; `conda-env-manager` supplies the production implementation.

pub mod driver;
pub mod error;
pub mod fakes;
pub mod fingerprint;
pub mod git;
pub mod manifest;
pub mod obs;
pub mod phase;
pub mod pipeline;
pub mod report;
pub mod spec;
pub mod step;
pub mod telemetry;

// Re-export key types
pub use driver::{ActivationEnv, DriverError, DriverResult, EnvironmentDriver};
pub use error::{BootstrapError, Result};
pub use fingerprint::EnvFingerprint;
pub use git::{capture_head_sha, head_sha_if_repo, is_git_repo};
pub use manifest::{manifest_path, parse_manifest, read_manifest};
pub use obs::{
    emit_bootstrap_finished, emit_bootstrap_started, emit_step_finished, emit_step_started,
    RunSpan,
};
pub use phase::BootstrapPhase;
pub use pipeline::BootstrapPipeline;
pub use report::{BootstrapReport, StepReport};
pub use spec::{BootstrapSpec, DependencySource};
pub use step::BootstrapStep;
pub use telemetry::init_tracing;

/// envstrap version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
