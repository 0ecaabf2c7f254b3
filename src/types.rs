use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_RELEASES_URL: &str = "https://api.github.com/repos/golangci/golangci-lint/releases";
pub const DEFAULT_INSTALLER_URL: &str =
    "https://raw.githubusercontent.com/golangci/golangci-lint/master/install.sh";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Directory holding cached linter binaries. Falls back to `$GOPATH/bin`.
    #[serde(default)]
    pub bin_dir: Option<String>,
    #[serde(default = "default_releases_url")]
    pub releases_url: String,
    #[serde(default = "default_installer_url")]
    pub installer_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_releases_url() -> String {
    DEFAULT_RELEASES_URL.to_string()
}
fn default_installer_url() -> String {
    DEFAULT_INSTALLER_URL.to_string()
}
fn default_page_size() -> u32 {
    100
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bin_dir: None,
            releases_url: default_releases_url(),
            installer_url: default_installer_url(),
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitHubRelease {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

/// A linter binary found in the cache directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedLinter {
    /// `latest` for the unversioned default binary.
    pub version: String,
    pub path: PathBuf,
    pub modified: Option<chrono::DateTime<chrono::Local>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed,
    AlreadyPresent,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallSummary {
    pub installed: Vec<String>,
    pub already_present: Vec<String>,
    pub skipped_below_min: Vec<String>,
}
