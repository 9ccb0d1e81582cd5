//! `conda info --json` output model.
//!
//! Only the fields the bootstrapper needs are modeled; conda's JSON carries
//! many more.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::Result;

/// Parsed `conda info --json` output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CondaInfo {
    /// Conda's own version.
    pub conda_version: Option<String>,

    /// Root (base) installation prefix.
    pub root_prefix: Option<PathBuf>,

    /// Known environment prefixes, including the root prefix.
    #[serde(default)]
    pub envs: Vec<PathBuf>,

    /// Directories conda creates named environments under.
    #[serde(default)]
    pub envs_dirs: Vec<PathBuf>,

    /// Prefix of the currently active environment, if any.
    pub active_prefix: Option<PathBuf>,
}

impl CondaInfo {
    /// Parse the raw JSON produced by `conda info --json`.
    pub fn parse(json: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(json)?)
    }

    /// Resolve a named environment to its prefix directory.
    ///
    /// Named environments live under one of `envs_dirs`; the prefix's final
    /// path component is the environment name.
    pub fn env_prefix(&self, name: &str) -> Option<PathBuf> {
        if let Some(found) = self
            .envs
            .iter()
            .find(|prefix| prefix.file_name().map(|n| n == name).unwrap_or(false))
        {
            return Some(found.clone());
        }

        // Freshly created environments are not always listed; fall back to
        // the first envs directory that actually contains the name.
        self.envs_dirs
            .iter()
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.is_dir())
    }

    /// Resolve a name against a specific filesystem root (testing seam).
    pub fn env_prefix_under(&self, name: &str, root: &Path) -> Option<PathBuf> {
        let candidate = root.join(name);
        candidate.is_dir().then_some(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INFO_JSON: &str = r#"{
        "conda_version": "24.1.2",
        "root_prefix": "/opt/conda",
        "envs": [
            "/opt/conda",
            "/opt/conda/envs/test-environment",
            "/opt/conda/envs/other"
        ],
        "envs_dirs": ["/opt/conda/envs"],
        "active_prefix": null,
        "platform": "linux-64"
    }"#;

    #[test]
    fn test_parse_info_json() {
        let info = CondaInfo::parse(INFO_JSON.as_bytes()).unwrap();
        assert_eq!(info.conda_version.as_deref(), Some("24.1.2"));
        assert_eq!(info.envs.len(), 3);
        assert_eq!(info.envs_dirs, vec![PathBuf::from("/opt/conda/envs")]);
    }

    #[test]
    fn test_env_prefix_found_in_envs_list() {
        let info = CondaInfo::parse(INFO_JSON.as_bytes()).unwrap();
        assert_eq!(
            info.env_prefix("test-environment"),
            Some(PathBuf::from("/opt/conda/envs/test-environment"))
        );
    }

    #[test]
    fn test_env_prefix_missing() {
        let info = CondaInfo::parse(INFO_JSON.as_bytes()).unwrap();
        assert_eq!(info.env_prefix("nope"), None);
    }

    #[test]
    fn test_env_prefix_under_falls_back_to_fs() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("fresh-env")).unwrap();

        let info = CondaInfo::parse(INFO_JSON.as_bytes()).unwrap();
        assert_eq!(
            info.env_prefix_under("fresh-env", root.path()),
            Some(root.path().join("fresh-env"))
        );
        assert_eq!(info.env_prefix_under("absent", root.path()), None);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(CondaInfo::parse(b"not json").is_err());
    }
}
