use clap::{Parser, Subcommand};

fn get_version() -> &'static str {
    const BASE_VERSION: &str = env!("CARGO_PKG_VERSION");

    if let Some(tag) = option_env!("GOLANG_CI_GIT_TAG") {
        return tag;
    }

    let commit = option_env!("GOLANG_CI_GIT_COMMIT").unwrap_or("unknown");
    let branch = option_env!("GOLANG_CI_GIT_BRANCH").unwrap_or("unknown");

    // Computed once at startup for clap, which wants a 'static str
    let version = format!("v{}-{} ({})", BASE_VERSION, commit, branch);
    Box::leak(version.into_boxed_str())
}

#[derive(Parser)]
#[command(name = "golang-ci")]
#[command(about = "CI tool for Golang")]
#[command(version = get_version(), propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (use multiple times for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce output to errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Runs linters using golangci-lint
    #[command(
        disable_version_flag = true,
        long_about = "Executes a specific version of golangci-lint, downloading to $GOPATH/bin as necessary.",
        after_help = "Examples:\n  # Run default version. Note that the `--` is necessary to pass arguments to golangci-lint.\n  golang-ci lint -- run -v\n\n  # Run a specific version of golangci-lint.\n  golang-ci lint --version v1.31.0 -- run -v"
    )]
    Lint {
        /// Version of golangci-lint to use. If not specified, will use latest version available.
        #[arg(long = "version", value_name = "VERSION")]
        lint_version: Option<String>,
        /// Arguments passed to golangci-lint
        #[arg(last = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Installs golangci-lint
    #[command(
        disable_version_flag = true,
        long_about = "Installs a specific version of golangci-lint, downloading to $GOPATH/bin as necessary.",
        after_help = "Examples:\n  # Installs the latest version at $GOPATH/bin/golangci-lint.\n  golang-ci lint-install latest\n\n  # Installs a specific version of golangci-lint at $GOPATH/bin/golangci-lint@v1.31.0.\n  golang-ci lint-install v1.31.0"
    )]
    LintInstall {
        /// Version to install, or 'latest'
        #[arg(value_name = "VERSION")]
        version: String,
    },

    /// Installs all versions of golangci-lint
    #[command(long_about = "Installs all versions of golangci-lint, downloading to $GOPATH/bin.")]
    LintInstallAll {
        /// Minimum version of golangci-lint that should be installed.
        #[arg(long)]
        min_version: Option<String>,
    },

    /// Lists released versions of golangci-lint
    LintVersions,

    /// Lists golangci-lint versions cached in $GOPATH/bin
    LintList,

    /// Manage golang-ci's configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show the current version
    Version,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a configuration setting
    Get {
        /// Key to get (if omitted, shows all settings)
        key: Option<String>,
    },
    /// Set a configuration setting
    Set {
        /// Key and value (e.g., 'bin-dir=/opt/lint' or 'bin-dir /opt/lint')
        #[arg(num_args = 1..=2, required = true)]
        args: Vec<String>,
    },
    /// Reset a configuration setting to its default
    Unset {
        /// Key to unset (e.g., 'bin-dir')
        key: String,
    },
    /// Show full configuration
    Show {
        /// Output format (json, yaml, plain)
        #[arg(long, default_value = "json")]
        format: String,
    },
}
