//! Installing golangci-lint through its upstream `install.sh`.
//!
//! The installer script is fetched into a private staging directory inside the
//! cache directory, run once per version with `-b <staging>/bin`, and the
//! binary it produces is renamed into place. Staging inside the cache
//! directory keeps that rename on a single filesystem.

use crate::download::fetch_installer;
use crate::paths::{self, is_installed, DEFAULT_BINARY_NAME, LATEST};
use crate::semver_order::{is_below_minimum, is_valid};
use crate::types::{InstallOutcome, InstallSummary, Settings};
use crate::versions::list_versions;
use anyhow::{anyhow, bail, Context, Result};
use reqwest::Client;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::process::Command;

pub struct Installer {
    script: PathBuf,
    staging: TempDir,
}

impl Installer {
    pub async fn prepare(client: &Client, installer_url: &str, bin_dir: &Path) -> Result<Self> {
        let staging = tempfile::Builder::new()
            .prefix(".golang-ci-")
            .tempdir_in(bin_dir)
            .with_context(|| format!("cannot create staging directory in {}", bin_dir.display()))?;

        let script = staging.path().join("install.sh");
        fetch_installer(client, installer_url, &script)
            .await
            .context("cannot fetch golangci-lint installer")?;

        Ok(Self { script, staging })
    }

    /// Runs the installer for `version` (`latest` passes no version) and
    /// moves the resulting binary to `dest`.
    pub async fn install(&self, version: &str, dest: &Path) -> Result<()> {
        let out_dir = self.staging.path().join("bin");
        fs::create_dir_all(&out_dir)
            .with_context(|| format!("cannot mkdir {}", out_dir.display()))?;

        let mut cmd = Command::new("sh");
        cmd.arg(&self.script).arg("-b").arg(&out_dir);
        if version != LATEST {
            cmd.arg(version);
        }

        tracing::debug!("Running installer: {:?}", cmd);
        let status = cmd
            .status()
            .await
            .with_context(|| format!("cannot start installer for {}", version))?;
        if !status.success() {
            bail!("error while running installer for {}: {}", version, status);
        }

        let built = out_dir.join(DEFAULT_BINARY_NAME);
        if !is_installed(&built) {
            bail!(
                "installer for {} did not produce {}",
                version,
                built.display()
            );
        }

        fs::rename(&built, dest).with_context(|| format!("cannot move to {}", dest.display()))?;
        Ok(())
    }
}

/// Installs a single version to `dest` with a freshly fetched installer.
pub async fn install_version(
    client: &Client,
    settings: &Settings,
    version: &str,
    dest: &Path,
) -> Result<()> {
    let staging_parent = match dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => parent.to_path_buf(),
        None => paths::bin_dir(settings)?,
    };
    fs::create_dir_all(&staging_parent)
        .with_context(|| format!("cannot mkdir {}", staging_parent.display()))?;

    let installer = Installer::prepare(client, &settings.installer_url, &staging_parent).await?;
    installer.install(version, dest).await
}

/// Installs `version` into the cache unless a binary is already there.
pub async fn ensure_installed(
    client: &Client,
    settings: &Settings,
    version: &str,
) -> Result<(PathBuf, InstallOutcome)> {
    let dest = paths::path_for_request(settings, version)?;

    if is_installed(&dest) {
        tracing::debug!("{} already present at {}", version, dest.display());
        return Ok((dest, InstallOutcome::AlreadyPresent));
    }

    tracing::info!("Installing {} at {}...", version, dest.display());
    install_version(client, settings, version, &dest)
        .await
        .with_context(|| format!("cannot install golangci-lint {} at {}", version, dest.display()))?;
    tracing::info!("Installed golangci-lint at path: {}", dest.display());

    Ok((dest, InstallOutcome::Installed))
}

/// Installs every released version at or above `min_version` into the cache.
pub async fn install_all(
    client: &Client,
    settings: &Settings,
    min_version: Option<&str>,
) -> Result<InstallSummary> {
    let min_version = min_version.filter(|v| !v.is_empty());
    if let Some(min) = min_version {
        if !is_valid(min) {
            return Err(anyhow!(
                "invalid minimum version '{}': expected a tag like v1.31.0",
                min
            ));
        }
    }

    let bin_dir = paths::bin_dir(settings)?;
    let versions = list_versions(client, &settings.releases_url, settings.page_size)
        .await
        .context("cannot fetch golangci-lint versions")?;
    tracing::info!("Found {} versions of golangci-lint.", versions.len());

    let mut summary = InstallSummary::default();
    let mut installer: Option<Installer> = None;

    for version in versions {
        if let Some(min) = min_version {
            if is_below_minimum(&version, min) {
                tracing::info!("Skipping install of {} < min version ({}).", version, min);
                summary.skipped_below_min.push(version);
                continue;
            }
        }

        let dest = bin_dir.join(paths::binary_name_for_version(&version));
        if is_installed(&dest) {
            tracing::info!("{} already present at {}.", version, dest.display());
            summary.already_present.push(version);
            continue;
        }

        // Fetched lazily so a fully cached directory needs no installer
        let installer = match &mut installer {
            Some(installer) => installer,
            slot => slot.insert(
                Installer::prepare(client, &settings.installer_url, &bin_dir).await?,
            ),
        };

        installer
            .install(&version, &dest)
            .await
            .with_context(|| format!("cannot install {} to {}", version, dest.display()))?;

        tracing::info!("Installed {} to {}.", version, bin_dir.display());
        summary.installed.push(version);
    }

    Ok(summary)
}
