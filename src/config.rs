use crate::types::*;
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::PathBuf;

pub const APP_NAME: &str = "golang-ci";
pub const CONFIG_FILE_NAME: &str = "config.json";

pub const SETTING_KEYS: [&str; 4] = ["bin_dir", "releases_url", "installer_url", "page_size"];

pub fn get_config_file_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os("GOLANG_CI_CONFIG").filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    let path = dirs::config_dir()
        .ok_or_else(|| anyhow!("Could not determine config directory"))?
        .join(APP_NAME)
        .join(CONFIG_FILE_NAME);
    tracing::debug!("Config file path: {}", path.display());
    Ok(path)
}

/// Reads the settings file as stored, without environment overrides.
pub fn load_stored_settings() -> Result<Settings> {
    let config_path = get_config_file_path()?;

    if !config_path.exists() {
        return Ok(Settings::default());
    }

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("Could not read config file at {}", config_path.display()))?;

    serde_json::from_str(&content).with_context(|| "Could not parse config file as JSON")
}

pub fn load_settings() -> Result<Settings> {
    let mut settings = load_stored_settings()?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

pub fn apply_env_overrides(settings: &mut Settings) {
    if let Some(bin_dir) = non_empty_env("GOLANG_CI_BIN_DIR") {
        settings.bin_dir = Some(bin_dir);
    }

    if let Some(url) = non_empty_env("GOLANG_CI_RELEASES_URL") {
        settings.releases_url = url;
    }

    if let Some(url) = non_empty_env("GOLANG_CI_INSTALLER_URL") {
        settings.installer_url = url;
    }

    if let Some(size) = non_empty_env("GOLANG_CI_PAGE_SIZE") {
        match size.parse::<u32>() {
            Ok(size) if size > 0 => settings.page_size = size,
            _ => tracing::warn!("Ignoring invalid GOLANG_CI_PAGE_SIZE '{}'", size),
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let config_path = get_config_file_path()?;
    let config_dir = config_path
        .parent()
        .ok_or_else(|| anyhow!("Invalid config path"))?;

    fs::create_dir_all(config_dir)
        .with_context(|| format!("cannot mkdir {}", config_dir.display()))?;

    let content = serde_json::to_string_pretty(settings)?;
    fs::write(&config_path, content)
        .with_context(|| format!("cannot write {}", config_path.display()))?;

    Ok(())
}

pub fn normalize_key(key: &str) -> String {
    key.replace('-', "_")
        .chars()
        .map(|c| {
            if c.is_ascii_uppercase() {
                format!("_{}", c.to_lowercase())
            } else {
                c.to_string()
            }
        })
        .collect::<String>()
        .to_lowercase()
}

pub fn get_setting(settings: &Settings, key: &str) -> Result<String> {
    let value = match normalize_key(key).as_str() {
        "bin_dir" => settings.bin_dir.clone().unwrap_or_default(),
        "releases_url" => settings.releases_url.clone(),
        "installer_url" => settings.installer_url.clone(),
        "page_size" => settings.page_size.to_string(),
        other => return Err(unknown_key(other)),
    };
    Ok(value)
}

pub fn set_setting(settings: &mut Settings, key: &str, value: &str) -> Result<()> {
    match normalize_key(key).as_str() {
        "bin_dir" => settings.bin_dir = Some(value.to_string()),
        "releases_url" => settings.releases_url = value.to_string(),
        "installer_url" => settings.installer_url = value.to_string(),
        "page_size" => {
            let size: u32 = value
                .parse()
                .with_context(|| format!("Invalid value for 'page_size': {}", value))?;
            if size == 0 {
                return Err(anyhow!("'page_size' must be greater than zero"));
            }
            settings.page_size = size;
        }
        other => return Err(unknown_key(other)),
    }
    Ok(())
}

pub fn unset_setting(settings: &mut Settings, key: &str) -> Result<()> {
    let defaults = Settings::default();
    match normalize_key(key).as_str() {
        "bin_dir" => settings.bin_dir = defaults.bin_dir,
        "releases_url" => settings.releases_url = defaults.releases_url,
        "installer_url" => settings.installer_url = defaults.installer_url,
        "page_size" => settings.page_size = defaults.page_size,
        other => return Err(unknown_key(other)),
    }
    Ok(())
}

fn unknown_key(key: &str) -> anyhow::Error {
    anyhow!(
        "'{}' is not a valid configuration setting. Valid settings: {}",
        key,
        SETTING_KEYS.join(", ")
    )
}

/// Accepts `key=value` or `key value`.
pub fn split_key_value(args: &[String]) -> Result<(String, String)> {
    match args {
        [single] => single
            .split_once('=')
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .ok_or_else(|| anyhow!("Invalid format. Use 'key=value' or 'key value'.")),
        [key, value] => Ok((key.clone(), value.clone())),
        _ => Err(anyhow!("Invalid format. Use 'key=value' or 'key value'.")),
    }
}

pub fn render_settings(settings: &Settings, format: &str) -> Result<String> {
    match format {
        "json" => Ok(serde_json::to_string_pretty(settings)?),
        "yaml" => Ok(serde_yaml::to_string(settings)?),
        "plain" => Ok(SETTING_KEYS
            .iter()
            .map(|key| {
                let value = get_setting(settings, key).unwrap_or_default();
                format!("{}: {}", key, value)
            })
            .collect::<Vec<_>>()
            .join("\n")),
        other => Err(anyhow!(
            "Unknown format '{}'. Use json, yaml or plain.",
            other
        )),
    }
}
