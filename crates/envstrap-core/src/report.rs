//! Bootstrap run reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::driver::DriverError;
use crate::fingerprint::EnvFingerprint;
use crate::phase::BootstrapPhase;
use crate::step::BootstrapStep;

/// Result of a single executed step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepReport {
    /// Which step ran.
    pub step: BootstrapStep,

    /// Duration in milliseconds.
    pub duration_ms: u64,

    /// Whether the step succeeded.
    pub success: bool,

    /// Failure description (external tool's stderr where available).
    pub error: Option<String>,

    /// Exit code of the failing external command, if one ran.
    pub exit_code: Option<i32>,
}

impl StepReport {
    /// A successful step.
    pub fn ok(step: BootstrapStep, duration_ms: u64) -> Self {
        Self {
            step,
            duration_ms,
            success: true,
            error: None,
            exit_code: None,
        }
    }

    /// A failed step, from the driver error that ended the run.
    pub fn failed(step: BootstrapStep, duration_ms: u64, error: &DriverError) -> Self {
        Self {
            step,
            duration_ms,
            success: false,
            error: Some(error.to_string()),
            exit_code: error.exit_code,
        }
    }

    /// Whether this step passed.
    pub fn passed(&self) -> bool {
        self.success
    }
}

/// Result of a complete bootstrap run.
///
/// Produced whether or not all steps passed; a failed run reports the phase
/// it reached and the failing step's diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapReport {
    /// Unique run ID.
    pub run_id: String,

    /// When the run started.
    pub created_at: DateTime<Utc>,

    /// HEAD SHA of the surrounding checkout, when one exists.
    pub git_sha: Option<String>,

    /// Digest of the ordered step names (run identity).
    pub steps_digest: String,

    /// Fingerprint of the requested environment. `None` when the run failed
    /// before the package set was resolved.
    pub fingerprint: Option<EnvFingerprint>,

    /// Phase the run reached.
    pub phase: BootstrapPhase,

    /// Results of the steps that ran, in order.
    pub steps: Vec<StepReport>,

    /// Total duration in milliseconds.
    pub duration_ms: u64,

    /// Whether every step passed.
    pub success: bool,
}

impl BootstrapReport {
    /// Number of steps that passed.
    pub fn passed_count(&self) -> usize {
        self.steps.iter().filter(|s| s.passed()).count()
    }

    /// Number of steps that failed.
    pub fn failed_count(&self) -> usize {
        self.steps.iter().filter(|s| !s.passed()).count()
    }

    /// The failing step's report, if the run failed.
    pub fn failure(&self) -> Option<&StepReport> {
        self.steps.iter().find(|s| !s.passed())
    }

    /// Process exit code for this run: 0 on success, otherwise the failing
    /// command's exit code when known, else 1.
    pub fn exit_code(&self) -> i32 {
        if self.success {
            return 0;
        }
        match self.failure().and_then(|s| s.exit_code) {
            Some(code) if code > 0 => code,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_with(steps: Vec<StepReport>, success: bool) -> BootstrapReport {
        BootstrapReport {
            run_id: "run-1".to_string(),
            created_at: Utc::now(),
            git_sha: None,
            steps_digest: "abc".to_string(),
            fingerprint: None,
            phase: BootstrapPhase::Unconfigured,
            steps,
            duration_ms: 0,
            success,
        }
    }

    #[test]
    fn test_counts() {
        let err = DriverError::new("create_environment", "boom").with_exit_code(2);
        let report = report_with(
            vec![
                StepReport::ok(BootstrapStep::RegisterChannel, 10),
                StepReport::failed(BootstrapStep::CreateEnvironment, 20, &err),
            ],
            false,
        );
        assert_eq!(report.passed_count(), 1);
        assert_eq!(report.failed_count(), 1);
    }

    #[test]
    fn test_exit_code_success() {
        let report = report_with(vec![StepReport::ok(BootstrapStep::RegisterChannel, 1)], true);
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn test_exit_code_propagates_failing_command() {
        let err = DriverError::new("install_dependencies", "unresolved").with_exit_code(120);
        let report = report_with(
            vec![StepReport::failed(BootstrapStep::InstallDependencies, 5, &err)],
            false,
        );
        assert_eq!(report.exit_code(), 120);
    }

    #[test]
    fn test_exit_code_defaults_to_one_without_command_code() {
        let err = DriverError::new("activate_environment", "no such environment");
        let report = report_with(
            vec![StepReport::failed(BootstrapStep::ActivateEnvironment, 5, &err)],
            false,
        );
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_report_serializes() {
        let report = report_with(vec![StepReport::ok(BootstrapStep::RegisterChannel, 1)], true);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("register_channel"));
    }
}
