//! Structured observability hooks for bootstrap lifecycle events.
//!
//! Events are emitted at `info!` level; filtering follows `RUST_LOG`.

use tracing::info;

/// RAII guard that enters a run-scoped tracing span for the duration of a
/// bootstrap run.
pub struct RunSpan {
    _span: tracing::span::EnteredSpan,
}

impl RunSpan {
    /// Create and enter a span tagged with the run_id.
    pub fn enter(run_id: &str) -> Self {
        let span = tracing::info_span!("envstrap.run", run_id = %run_id);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: bootstrap started for an environment.
pub fn emit_bootstrap_started(run_id: &str, env_name: &str, runtime_version: &str) {
    info!(
        event = "bootstrap.started",
        run_id = %run_id,
        env_name = %env_name,
        runtime_version = %runtime_version,
    );
}

/// Emit event: a step began executing.
pub fn emit_step_started(run_id: &str, step: &str) {
    info!(event = "bootstrap.step_started", run_id = %run_id, step = %step);
}

/// Emit event: a step finished.
pub fn emit_step_finished(run_id: &str, step: &str, duration_ms: u64, success: bool) {
    info!(
        event = "bootstrap.step_finished",
        run_id = %run_id,
        step = %step,
        duration_ms = duration_ms,
        success = success,
    );
}

/// Emit event: bootstrap finished with the phase it reached.
pub fn emit_bootstrap_finished(run_id: &str, phase: &str, duration_ms: u64, success: bool) {
    info!(
        event = "bootstrap.finished",
        run_id = %run_id,
        phase = %phase,
        duration_ms = duration_ms,
        success = success,
    );
}
