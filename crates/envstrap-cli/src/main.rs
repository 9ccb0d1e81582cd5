//! envstrap - CI environment bootstrapper
//!
//! The `envstrap` command prepares an isolated build environment for a CI
//! job: it registers a package channel, creates an environment pinned to
//! `TARGET_RUNTIME_VERSION`, activates it, and installs the job's
//! dependencies — either from `ci/<JOB_NAME>.txt` or from an inline list.
//!
//! ## Commands
//!
//! - `bootstrap`: run the four-step bootstrap and propagate the exit code
//! - `fingerprint`: print the target environment's identity without running
//! - `info`: show conda availability and CI context

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;

use conda_env_manager::{conda_version, is_conda_available, CondaDriver};
use envstrap_core::{
    head_sha_if_repo, init_tracing, BootstrapPipeline, BootstrapReport, BootstrapSpec,
    DependencySource, EnvFingerprint,
};

#[derive(Parser)]
#[command(name = "envstrap")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Bootstrap an isolated CI build environment", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register the channel, create and activate the environment, install
    /// the job's dependencies
    Bootstrap {
        /// Interpreter version to pin the environment to
        #[arg(long, env = "TARGET_RUNTIME_VERSION")]
        runtime_version: String,

        /// Job name; selects the manifest <manifest-dir>/<job>.txt
        #[arg(long, env = "JOB_NAME")]
        job: Option<String>,

        /// Directory containing job manifests
        #[arg(long, default_value = "ci")]
        manifest_dir: PathBuf,

        /// Inline package list (comma-separated); replaces the manifest
        #[arg(long, value_delimiter = ',', conflicts_with = "job")]
        packages: Vec<String>,

        /// Name of the environment to create
        #[arg(long, default_value = "test-environment")]
        env_name: String,

        /// Channel to append (lower priority than existing channels)
        #[arg(long, default_value = "conda-forge")]
        channel: String,

        /// Per-operation timeout in seconds (0 = none)
        #[arg(long, default_value = "3600")]
        timeout_secs: u64,

        /// Print the full run report as JSON
        #[arg(long)]
        report_json: bool,
    },

    /// Print the fingerprint of the requested environment
    Fingerprint {
        /// Interpreter version
        #[arg(long, env = "TARGET_RUNTIME_VERSION")]
        runtime_version: String,

        /// Job name; selects the manifest <manifest-dir>/<job>.txt
        #[arg(long, env = "JOB_NAME")]
        job: Option<String>,

        /// Directory containing job manifests
        #[arg(long, default_value = "ci")]
        manifest_dir: PathBuf,

        /// Inline package list (comma-separated)
        #[arg(long, value_delimiter = ',', conflicts_with = "job")]
        packages: Vec<String>,

        /// Channel to append
        #[arg(long, default_value = "conda-forge")]
        channel: String,
    },

    /// Show conda availability and CI context
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    match cli.command {
        Commands::Bootstrap {
            runtime_version,
            job,
            manifest_dir,
            packages,
            env_name,
            channel,
            timeout_secs,
            report_json,
        } => {
            let source = dependency_source(job, &manifest_dir, packages)?;
            let spec = BootstrapSpec::new(env_name, runtime_version, channel, source, timeout_secs)?;
            let report = cmd_bootstrap(&spec, report_json).await?;
            if !report.success {
                // The failing conda invocation's exit code becomes the
                // process exit code, so the CI system sees the real failure.
                std::process::exit(report.exit_code());
            }
            Ok(())
        }
        Commands::Fingerprint {
            runtime_version,
            job,
            manifest_dir,
            packages,
            channel,
        } => {
            let source = dependency_source(job, &manifest_dir, packages)?;
            cmd_fingerprint(&runtime_version, &channel, &source)
        }
        Commands::Info => cmd_info(),
    }
}

/// Pick the dependency source from the two mutually exclusive modes.
fn dependency_source(
    job: Option<String>,
    manifest_dir: &std::path::Path,
    packages: Vec<String>,
) -> Result<DependencySource> {
    if !packages.is_empty() {
        return Ok(DependencySource::Inline { packages });
    }
    match job {
        Some(job_name) => Ok(DependencySource::JobManifest {
            dir: manifest_dir.to_path_buf(),
            job_name,
        }),
        None => anyhow::bail!("either --job (or JOB_NAME) or --packages is required"),
    }
}

async fn cmd_bootstrap(spec: &BootstrapSpec, report_json: bool) -> Result<BootstrapReport> {
    let driver = CondaDriver::from_path()
        .context("conda is required to bootstrap the environment")?
        .with_timeout(spec.timeout_secs);

    println!("Bootstrapping environment: {}", spec.env_name);
    println!("Runtime version: {}", spec.runtime_version);
    println!("Channel: {}", spec.channel);
    println!("Dependencies: {}", spec.source.describe());
    println!();

    let report = BootstrapPipeline::run(Arc::new(driver), spec)
        .await
        .context("bootstrap pipeline failed to run")?;

    if report_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(report);
    }

    // Print results
    println!("Run ID: {}", report.run_id);
    println!(
        "Status: {}",
        if report.success { "✓ PASSED" } else { "✗ FAILED" }
    );
    println!("Phase reached: {}", report.phase);
    println!("Duration: {}ms", report.duration_ms);
    println!();

    for step in &report.steps {
        let status = if step.passed() { "✓" } else { "✗" };
        println!("  {} {} ({}ms)", status, step.step, step.duration_ms);
        if let Some(error) = &step.error {
            println!("      {}", error);
        }
    }

    println!();
    println!(
        "Summary: {}/{} steps passed",
        report.passed_count(),
        report.steps.len()
    );
    if let Some(fingerprint) = &report.fingerprint {
        println!("Environment fingerprint: {}", fingerprint.short());
    }
    if let Some(git_sha) = &report.git_sha {
        println!("Git SHA: {}", git_sha);
    }

    Ok(report)
}

fn cmd_fingerprint(runtime_version: &str, channel: &str, source: &DependencySource) -> Result<()> {
    let packages = source.resolve()?;
    let fingerprint = EnvFingerprint::compute(runtime_version, channel, &packages);

    println!("Environment fingerprint: {}", fingerprint);
    println!("Short: {}", fingerprint.short());
    println!("Packages: {}", packages.join(", "));
    Ok(())
}

fn cmd_info() -> Result<()> {
    println!("envstrap Environment Info");
    println!("=========================");
    println!();

    let conda = is_conda_available();
    println!("Conda installed: {}", if conda { "yes" } else { "no" });
    if conda {
        if let Ok(version) = conda_version() {
            println!("Conda version: {}", version);
        }
    }

    println!();
    println!("CI context:");
    match std::env::var("TARGET_RUNTIME_VERSION") {
        Ok(version) => println!("  TARGET_RUNTIME_VERSION: {}", version),
        Err(_) => println!("  TARGET_RUNTIME_VERSION: (not set)"),
    }
    match std::env::var("JOB_NAME") {
        Ok(job) => println!("  JOB_NAME: {}", job),
        Err(_) => println!("  JOB_NAME: (not set)"),
    }
    match head_sha_if_repo(std::path::Path::new(".")) {
        Some(sha) => println!("  Git SHA: {}", sha),
        None => println!("  Git SHA: (not a git checkout)"),
    }

    Ok(())
}
