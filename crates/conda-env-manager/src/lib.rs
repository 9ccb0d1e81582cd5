//! Conda-Env-Manager: conda CLI integration for envstrap
//!
//! This crate provides the production [`EnvironmentDriver`] implementation:
//! it locates a conda-compatible executable and maps the four bootstrap
//! operations onto CLI invocations (`config --append channels`, `create`,
//! `info --json` for activation, `install`).
//!
//! Conda's own resolution, retry and caching behavior is deliberately
//! opaque here; failures surface as [`CondaError`] with the tool's exit
//! code and stderr attached.

pub mod binary;
pub mod driver;
pub mod error;
pub mod info;

pub use binary::{conda_version, is_conda_available, locate_conda};
pub use driver::CondaDriver;
pub use error::CondaError;
pub use info::CondaInfo;

pub use envstrap_core::driver::EnvironmentDriver;

/// Result type for conda operations
pub type Result<T> = std::result::Result<T, CondaError>;
