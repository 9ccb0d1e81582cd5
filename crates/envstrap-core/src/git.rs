//! Git context capture for run reports.
//!
//! CI jobs run inside a checkout; the report records which commit the
//! environment was built for.

use std::path::Path;
use std::process::Command;

use crate::error::{BootstrapError, Result};

/// Capture the HEAD commit SHA of the checkout at `repo_dir`.
///
/// Runs `git rev-parse HEAD`. Returns an error if the directory is not
/// inside a git repository or git is not available.
pub fn capture_head_sha(repo_dir: &Path) -> Result<String> {
    let output = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .current_dir(repo_dir)
        .output()
        .map_err(|e| BootstrapError::Git(format!("failed to run git: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(BootstrapError::Git(format!(
            "git rev-parse HEAD failed: {stderr}"
        )));
    }

    let sha = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if sha.is_empty() {
        return Err(BootstrapError::Git(
            "git rev-parse HEAD returned empty output".to_string(),
        ));
    }

    Ok(sha)
}

/// Whether a directory is inside a git work tree.
pub fn is_git_repo(dir: &Path) -> bool {
    Command::new("git")
        .args(["rev-parse", "--is-inside-work-tree"])
        .current_dir(dir)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// HEAD SHA when `dir` is a checkout, `None` otherwise.
pub fn head_sha_if_repo(dir: &Path) -> Option<String> {
    if is_git_repo(dir) {
        capture_head_sha(dir).ok()
    } else {
        None
    }
}
