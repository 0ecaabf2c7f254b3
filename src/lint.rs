use crate::install::ensure_installed;
use crate::paths::LATEST;
use crate::types::{InstallOutcome, Settings};
use anyhow::{Context, Result};
use reqwest::Client;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use tokio::process::Command;

/// Picks the binary for `version` (default binary when `None`), installing
/// it first if the cache does not have it yet.
pub async fn resolve_linter(
    client: &Client,
    settings: &Settings,
    version: Option<&str>,
) -> Result<PathBuf> {
    let version = version.filter(|v| !v.is_empty()).unwrap_or(LATEST);
    let (path, outcome) = ensure_installed(client, settings, version)
        .await
        .with_context(|| format!("cannot install golangci-lint {}", version))?;

    if outcome == InstallOutcome::AlreadyPresent {
        tracing::debug!("Found cached golangci-lint {} at {}", version, path.display());
    }
    Ok(path)
}

/// Runs the linter with `args` forwarded untouched and stdio inherited.
pub async fn run_linter<S: AsRef<OsStr>>(linter: &Path, args: &[S]) -> Result<ExitStatus> {
    tracing::info!("Using golangci-lint at path {}.", linter.display());

    let mut cmd = Command::new(linter);
    cmd.args(args);
    tracing::debug!("Executing: {:?}", cmd);

    cmd.status()
        .await
        .with_context(|| format!("cannot execute {}", linter.display()))
}

/// Exit code the wrapper should report for the linter's status.
pub fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
