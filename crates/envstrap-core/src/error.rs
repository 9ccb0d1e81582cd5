//! Error taxonomy for the bootstrap pipeline.

use std::path::PathBuf;

use crate::driver::DriverError;

/// Errors produced while preparing or running a bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// The bootstrap spec was rejected before any step ran.
    #[error("invalid bootstrap spec: {0}")]
    InvalidSpec(String),

    /// The job's dependency manifest does not exist.
    #[error("dependency manifest not found: {0}")]
    ManifestNotFound(PathBuf),

    /// The manifest exists but lists no packages.
    #[error("dependency manifest is empty: {0}")]
    EmptyManifest(PathBuf),

    /// An environment-manager operation failed.
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// Git metadata capture failed.
    #[error("git error: {0}")]
    Git(String),

    /// Serialization error (report or spec output).
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for bootstrap operations.
pub type Result<T> = std::result::Result<T, BootstrapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_not_found_names_path() {
        let err = BootstrapError::ManifestNotFound(PathBuf::from("ci/py311.txt"));
        assert!(err.to_string().contains("ci/py311.txt"));
    }

    #[test]
    fn driver_error_is_transparent() {
        let driver = DriverError::new("create_environment", "version not found");
        let err = BootstrapError::from(driver);
        assert_eq!(err.to_string(), "create_environment failed: version not found");
    }
}
