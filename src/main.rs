mod cli;
mod config;
mod download;
mod install;
mod lint;
mod paths;
mod semver_order;
mod types;
mod versions;


use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, ConfigAction};
use config::{load_settings, load_stored_settings, save_settings};
use install::{ensure_installed, install_all};
use lint::{exit_code, resolve_linter, run_linter};
use types::{InstallOutcome, Settings};
use versions::{http_client, list_versions};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(&cli)?;

    let settings = load_settings()?;

    match cli.command {
        Commands::Version => {
            println!("golang-ci v{}", env!("CARGO_PKG_VERSION"));
        }

        Commands::Lint { lint_version, args } => {
            let client = http_client()?;
            let linter = resolve_linter(&client, &settings, lint_version.as_deref()).await?;
            let status = run_linter(&linter, &args).await?;
            if !status.success() {
                tracing::debug!("golangci-lint exited with {}", status);
                std::process::exit(exit_code(status));
            }
        }

        Commands::LintInstall { version } => {
            let client = http_client()?;
            let (path, outcome) = ensure_installed(&client, &settings, &version).await?;
            if outcome == InstallOutcome::AlreadyPresent {
                tracing::info!("File already exists: {}", path.display());
            }
        }

        Commands::LintInstallAll { min_version } => {
            let client = http_client()?;
            let summary = install_all(&client, &settings, min_version.as_deref()).await?;
            tracing::info!(
                "Installed {} version(s); {} already present, {} below minimum version.",
                summary.installed.len(),
                summary.already_present.len(),
                summary.skipped_below_min.len()
            );
        }

        Commands::LintVersions => {
            let client = http_client()?;
            let versions = list_versions(&client, &settings.releases_url, settings.page_size).await?;
            for version in versions {
                println!("{}", version);
            }
        }

        Commands::LintList => {
            list_cached_linters(&settings)?;
        }

        Commands::Config { action } => {
            handle_config(action, &settings)?;
        }
    }

    Ok(())
}

fn setup_logging(cli: &Cli) -> Result<()> {
    use std::io::IsTerminal;
    use tracing_subscriber::{fmt, EnvFilter};

    let level = if cli.quiet {
        "error"
    } else if cli.verbose == 0 {
        "info"
    } else if cli.verbose == 1 {
        "debug"
    } else {
        "trace"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout belongs to golangci-lint
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    Ok(())
}

fn list_cached_linters(settings: &Settings) -> Result<()> {
    let dir = paths::bin_dir(settings)?;
    let cached = paths::list_cached(&dir)?;

    println!("--- Cached golangci-lint versions ({}) ---", dir.display());
    if cached.is_empty() {
        println!("  No versions installed yet.");
        return Ok(());
    }

    for linter in cached {
        let modified = linter
            .modified
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        println!("  - {:<12} {}  {}", linter.version, modified, linter.path.display());
    }
    Ok(())
}

fn handle_config(action: ConfigAction, effective: &Settings) -> Result<()> {
    match action {
        ConfigAction::Get { key: Some(key) } => {
            println!("{}", config::get_setting(effective, &key)?);
        }
        ConfigAction::Get { key: None } => {
            println!("--- golang-ci Settings ---");
            for line in config::render_settings(effective, "plain")?.lines() {
                println!("  {}", line);
            }
        }
        ConfigAction::Set { args } => {
            let (key, value) = config::split_key_value(&args)?;
            // Persist only what is stored on disk, never env overrides
            let mut stored = load_stored_settings()?;
            config::set_setting(&mut stored, &key, &value)?;
            save_settings(&stored)?;
            tracing::info!("Setting '{}' updated to '{}'", config::normalize_key(&key), value);
        }
        ConfigAction::Unset { key } => {
            let mut stored = load_stored_settings()?;
            config::unset_setting(&mut stored, &key)?;
            save_settings(&stored)?;
            tracing::info!("Setting '{}' unset", config::normalize_key(&key));
        }
        ConfigAction::Show { format } => {
            println!("{}", config::render_settings(effective, &format)?);
        }
    }
    Ok(())
}
