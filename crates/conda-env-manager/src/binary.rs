//! Conda binary discovery.

use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

use crate::error::CondaError;
use crate::Result;

/// Locate the conda executable.
///
/// Honors the `CONDA_EXE` environment variable (set by conda's own shell
/// integration) before probing `conda` on PATH with `--version`.
pub fn locate_conda() -> Result<PathBuf> {
    if let Ok(exe) = std::env::var("CONDA_EXE") {
        if !exe.trim().is_empty() {
            debug!(exe = %exe, "Using conda from CONDA_EXE");
            return Ok(PathBuf::from(exe));
        }
    }

    let probe = Command::new("conda").arg("--version").output();
    match probe {
        Ok(output) if output.status.success() => Ok(PathBuf::from("conda")),
        _ => Err(CondaError::CondaNotFound),
    }
}

/// Whether a conda executable can be found at all.
pub fn is_conda_available() -> bool {
    locate_conda().is_ok()
}

/// Version string of the located conda, e.g. `24.1.2`.
pub fn conda_version() -> Result<String> {
    let exe = locate_conda()?;
    let output = Command::new(&exe).arg("--version").output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CondaError::CommandFailed {
            operation: "--version".to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            stderr: stderr.to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_version_output(&stdout).ok_or(CondaError::CondaNotFound)
}

/// Parse `conda --version` output ("conda 24.1.2") into the bare version.
fn parse_version_output(output: &str) -> Option<String> {
    let trimmed = output.trim();
    let version = trimmed.strip_prefix("conda ").unwrap_or(trimmed);
    if version.is_empty() {
        None
    } else {
        Some(version.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version_output() {
        assert_eq!(
            parse_version_output("conda 24.1.2\n"),
            Some("24.1.2".to_string())
        );
    }

    #[test]
    fn test_parse_version_output_bare() {
        assert_eq!(parse_version_output("4.10.3"), Some("4.10.3".to_string()));
    }

    #[test]
    fn test_parse_version_output_empty() {
        assert_eq!(parse_version_output("   "), None);
    }
}
