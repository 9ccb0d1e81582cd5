//! Environment fingerprints.
//!
//! A fingerprint identifies the *requested* target environment: runtime
//! version, channel and package set. Two runs asking for the same
//! environment produce the same fingerprint regardless of package order,
//! which makes the re-run idempotence of the underlying manager observable.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// SHA-256 identity of a requested environment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnvFingerprint {
    hash: String,
}

impl EnvFingerprint {
    /// Compute the fingerprint of a requested environment.
    pub fn compute(runtime_version: &str, channel: &str, packages: &[String]) -> Self {
        let mut sorted: Vec<&str> = packages.iter().map(String::as_str).collect();
        sorted.sort_unstable();

        let mut hasher = Sha256::new();
        hasher.update(runtime_version.as_bytes());
        hasher.update(b"\0");
        hasher.update(channel.as_bytes());
        hasher.update(b"\0");
        for package in sorted {
            hasher.update(package.as_bytes());
            hasher.update(b"\0");
        }

        Self {
            hash: hex::encode(hasher.finalize()),
        }
    }

    /// Full hex digest.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Short form (first 12 characters) for logs.
    pub fn short(&self) -> &str {
        &self.hash[..12.min(self.hash.len())]
    }
}

impl std::fmt::Display for EnvFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.hash)
    }
}
