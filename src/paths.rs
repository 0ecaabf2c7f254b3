//! Naming convention for cached linter binaries.
//!
//! Every version lives next to the others in a single directory:
//! `golangci-lint@v1.31.0`, `golangci-lint@v1.50.1`, ... while the plain
//! `golangci-lint` file is the default ("latest") installation.

use crate::semver_order::compare_versions;
use crate::types::{CachedLinter, Settings};
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_BINARY_NAME: &str = "golangci-lint";
pub const LATEST: &str = "latest";

pub fn binary_name_for_version(version: &str) -> String {
    format!("{}@{}", DEFAULT_BINARY_NAME, version)
}

/// Resolves the cache directory, creating it as necessary.
pub fn bin_dir(settings: &Settings) -> Result<PathBuf> {
    let path = match settings.bin_dir.as_deref().filter(|d| !d.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => gopath()?.join("bin"),
    };

    fs::create_dir_all(&path).with_context(|| format!("cannot mkdir {}", path.display()))?;
    tracing::debug!("Linter cache directory: {}", path.display());
    Ok(path)
}

fn gopath() -> Result<PathBuf> {
    if let Some(gopath) = std::env::var_os("GOPATH").filter(|p| !p.is_empty()) {
        // GOPATH may be a list; Go installs binaries into the first entry
        if let Some(first) = std::env::split_paths(&gopath).next() {
            return Ok(first);
        }
    }

    dirs::home_dir()
        .map(|home| home.join("go"))
        .ok_or_else(|| anyhow!("cannot determine $GOPATH: neither GOPATH nor HOME is set"))
}

pub fn path_for_version(settings: &Settings, version: &str) -> Result<PathBuf> {
    Ok(bin_dir(settings)?.join(binary_name_for_version(version)))
}

pub fn default_path(settings: &Settings) -> Result<PathBuf> {
    Ok(bin_dir(settings)?.join(DEFAULT_BINARY_NAME))
}

/// `latest` resolves to the default binary, anything else to a pinned one.
pub fn path_for_request(settings: &Settings, version: &str) -> Result<PathBuf> {
    if version == LATEST {
        default_path(settings)
    } else {
        path_for_version(settings, version)
    }
}

/// A directory squatting on the path does not count as an installation.
pub fn is_installed(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

pub fn version_from_file_name(file_name: &str) -> Option<String> {
    if file_name == DEFAULT_BINARY_NAME {
        return Some(LATEST.to_string());
    }
    file_name
        .strip_prefix(DEFAULT_BINARY_NAME)
        .and_then(|rest| rest.strip_prefix('@'))
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}

/// Lists cached binaries, pinned versions in ascending order and `latest` last.
pub fn list_cached(dir: &Path) -> Result<Vec<CachedLinter>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("cannot read directory {}", dir.display()))?;

    let mut cached: Vec<CachedLinter> = entries
        .flatten()
        .filter_map(|entry| {
            let path = entry.path();
            let version = version_from_file_name(&entry.file_name().to_string_lossy())?;
            let metadata = fs::metadata(&path).ok().filter(|m| m.is_file())?;
            let modified = metadata.modified().ok().map(chrono::DateTime::from);
            Some(CachedLinter {
                version,
                path,
                modified,
            })
        })
        .collect();

    cached.sort_by(|a, b| match (a.version == LATEST, b.version == LATEST) {
        (true, false) => std::cmp::Ordering::Greater,
        (false, true) => std::cmp::Ordering::Less,
        _ => compare_versions(&a.version, &b.version).then_with(|| a.version.cmp(&b.version)),
    });

    Ok(cached)
}
