//! Error types for conda-env-manager

use thiserror::Error;

/// Errors that can occur while driving the conda CLI
#[derive(Error, Debug)]
pub enum CondaError {
    /// Conda binary not found
    #[error("conda is not installed or not in PATH (set CONDA_EXE to override)")]
    CondaNotFound,

    /// A conda invocation exited non-zero
    #[error("conda {operation} failed with exit code {exit_code}: {stderr}")]
    CommandFailed {
        operation: String,
        exit_code: i32,
        stderr: String,
    },

    /// A conda invocation exceeded the per-operation timeout
    #[error("conda {operation} timed out after {secs} seconds")]
    Timeout { operation: String, secs: u64 },

    /// Named environment missing from `conda info` output
    #[error("environment not found: {0}")]
    EnvironmentNotFound(String),

    /// `conda info --json` produced unparseable output
    #[error("invalid conda info output: {0}")]
    InvalidInfo(#[from] serde_json::Error),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CondaError {
    /// Exit code of the failing conda invocation, when one ran.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            CondaError::CommandFailed { exit_code, .. } => Some(*exit_code),
            _ => None,
        }
    }
}
