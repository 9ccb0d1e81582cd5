//! Job dependency manifests.
//!
//! A manifest is a newline-separated list of package names, one per line,
//! conventionally at `ci/<job>.txt`. Blank lines and `#` comments are
//! ignored.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{BootstrapError, Result};

/// Path of the manifest for a job: `<dir>/<job_name>.txt`.
pub fn manifest_path(dir: &Path, job_name: &str) -> PathBuf {
    dir.join(format!("{job_name}.txt"))
}

/// Read a manifest file into an ordered package list.
///
/// Fails with [`BootstrapError::ManifestNotFound`] when the file does not
/// exist and [`BootstrapError::EmptyManifest`] when it lists no packages.
pub fn read_manifest(path: &Path) -> Result<Vec<String>> {
    if !path.is_file() {
        return Err(BootstrapError::ManifestNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let packages = parse_manifest(&content);
    if packages.is_empty() {
        return Err(BootstrapError::EmptyManifest(path.to_path_buf()));
    }

    debug!(manifest = %path.display(), count = packages.len(), "Read dependency manifest");
    Ok(packages)
}

/// Parse manifest content: one package per line, blanks and comments skipped.
pub fn parse_manifest(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_manifest_path_from_job_name() {
        let path = manifest_path(Path::new("ci"), "py311");
        assert_eq!(path, PathBuf::from("ci/py311.txt"));
    }

    #[test]
    fn test_parse_manifest_skips_blanks_and_comments() {
        let content = "numpy\n\n# testing deps\nmock\n  contextlib2  \n";
        let packages = parse_manifest(content);
        assert_eq!(packages, vec!["numpy", "mock", "contextlib2"]);
    }

    #[test]
    fn test_parse_manifest_preserves_order() {
        let packages = parse_manifest("openjpeg\nnumpy\n");
        assert_eq!(packages, vec!["openjpeg", "numpy"]);
    }

    #[test]
    fn test_read_manifest_missing_file() {
        let dir = tempdir().unwrap();
        let path = manifest_path(dir.path(), "no-such-job");

        let err = read_manifest(&path).unwrap_err();
        assert!(matches!(err, BootstrapError::ManifestNotFound(_)));
    }

    #[test]
    fn test_read_manifest_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "# nothing here\n\n").unwrap();

        let err = read_manifest(&path).unwrap_err();
        assert!(matches!(err, BootstrapError::EmptyManifest(_)));
    }

    #[test]
    fn test_read_manifest_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("job.txt");
        std::fs::write(&path, "numpy\ncontextlib2\nmock\nopenjpeg\n").unwrap();

        let packages = read_manifest(&path).unwrap();
        assert_eq!(packages, vec!["numpy", "contextlib2", "mock", "openjpeg"]);
    }
}
