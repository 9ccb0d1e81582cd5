//! Bootstrap pipeline orchestration.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::driver::{ActivationEnv, DriverError, EnvironmentDriver};
use crate::error::Result;
use crate::fingerprint::EnvFingerprint;
use crate::git;
use crate::obs::{
    emit_bootstrap_finished, emit_bootstrap_started, emit_step_finished, emit_step_started,
    RunSpan,
};
use crate::phase::BootstrapPhase;
use crate::report::{BootstrapReport, StepReport};
use crate::spec::BootstrapSpec;
use crate::step::BootstrapStep;

/// Bootstrap pipeline orchestrator.
///
/// Executes the four steps strictly in order, fail-fast: the first failing
/// step ends the run and the remaining steps are never invoked. There are
/// no retries and no rollback; whatever the failing tool left behind is the
/// CI job's ephemeral state.
pub struct BootstrapPipeline;

impl BootstrapPipeline {
    /// Run a bootstrap against the given driver.
    ///
    /// Returns a [`BootstrapReport`] for failed runs too; only report
    /// assembly itself can error.
    pub async fn run(
        driver: Arc<dyn EnvironmentDriver>,
        spec: &BootstrapSpec,
    ) -> Result<BootstrapReport> {
        let start = Instant::now();
        let run_id = Uuid::new_v4().to_string();
        let created_at = Utc::now();

        let _span = RunSpan::enter(&run_id);
        emit_bootstrap_started(&run_id, &spec.env_name, &spec.runtime_version);
        info!(source = %spec.source.describe(), "Starting environment bootstrap");

        let git_sha = git::head_sha_if_repo(Path::new("."));

        let mut steps: Vec<StepReport> = Vec::new();
        let mut phase = BootstrapPhase::Unconfigured;
        let mut activation: Option<ActivationEnv> = None;
        let mut resolved_packages: Option<Vec<String>> = None;

        for step in BootstrapStep::ALL {
            emit_step_started(&run_id, step.name());
            let step_start = Instant::now();

            let outcome = Self::execute_step(
                driver.as_ref(),
                spec,
                step,
                &mut activation,
                &mut resolved_packages,
            )
            .await;

            let duration_ms = step_start.elapsed().as_millis() as u64;
            emit_step_finished(&run_id, step.name(), duration_ms, outcome.is_ok());

            match outcome {
                Ok(()) => {
                    phase = step.completes();
                    steps.push(StepReport::ok(step, duration_ms));
                }
                Err(err) => {
                    warn!(step = %step.name(), error = %err, "Bootstrap step failed, aborting run");
                    steps.push(StepReport::failed(step, duration_ms, &err));
                    break;
                }
            }
        }

        let success = phase.is_complete();
        let duration_ms = start.elapsed().as_millis() as u64;
        emit_bootstrap_finished(&run_id, phase.name(), duration_ms, success);

        let fingerprint = resolved_packages
            .as_deref()
            .map(|packages| EnvFingerprint::compute(&spec.runtime_version, &spec.channel, packages));

        Ok(BootstrapReport {
            run_id,
            created_at,
            git_sha,
            steps_digest: spec.steps_digest.clone(),
            fingerprint,
            phase,
            steps,
            duration_ms,
            success,
        })
    }

    /// Execute one step, threading the activation overlay and the resolved
    /// package set between steps.
    async fn execute_step(
        driver: &dyn EnvironmentDriver,
        spec: &BootstrapSpec,
        step: BootstrapStep,
        activation: &mut Option<ActivationEnv>,
        resolved_packages: &mut Option<Vec<String>>,
    ) -> std::result::Result<(), DriverError> {
        match step {
            BootstrapStep::RegisterChannel => driver.register_channel(&spec.channel).await,
            BootstrapStep::CreateEnvironment => {
                driver
                    .create_environment(&spec.env_name, &spec.runtime_version)
                    .await
            }
            BootstrapStep::ActivateEnvironment => {
                let overlay = driver.activate(&spec.env_name).await?;
                *activation = Some(overlay);
                Ok(())
            }
            BootstrapStep::InstallDependencies => {
                // Dependency resolution belongs to this step: a missing
                // manifest fails here, after the earlier steps succeeded.
                let packages = spec
                    .source
                    .resolve()
                    .map_err(|e| DriverError::new(step.name(), e.to_string()))?;
                *resolved_packages = Some(packages.clone());

                let overlay = activation.as_ref().ok_or_else(|| {
                    DriverError::new(step.name(), "environment has not been activated")
                })?;

                driver.install(&spec.env_name, overlay, &packages).await

            }
        }
    }
}
