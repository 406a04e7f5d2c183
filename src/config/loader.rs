use super::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "bootkit.toml";

/// Find config file in order of priority:
/// 1. Explicit --config flag path
/// 2. ./bootkit.toml (current directory)
/// 3. `dirs::config_dir()`/bootkit/bootkit.toml (`~/.config` on Linux,
///    `~/Library/Application Support` on macOS)
/// 4. ~/.bootkit.toml
///
/// Returns `Ok(None)` when nothing was given and nothing was found.
pub fn find_config_file(explicit_path: Option<&Path>) -> Result<Option<PathBuf>> {
    // 1. Explicit path
    if let Some(path) = explicit_path {
        if path.exists() {
            return Ok(Some(path.to_path_buf()));
        }
        anyhow::bail!("Config file not found: {}", path.display());
    }

    // 2. Current directory
    let cwd_config = PathBuf::from(".").join(CONFIG_FILE_NAME);
    if cwd_config.exists() {
        return Ok(Some(cwd_config));
    }

    // 3. <platform config dir>/bootkit/bootkit.toml
    if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join("bootkit").join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Ok(Some(config_path));
        }
    }

    // 4. ~/.bootkit.toml
    if let Some(home_dir) = dirs::home_dir() {
        let home_config = home_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if home_config.exists() {
            return Ok(Some(home_config));
        }
    }

    Ok(None)
}

/// Load and parse config file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?;

    Ok(config)
}

/// Load config with automatic discovery; a config file must exist
pub fn load_config_auto(explicit_path: Option<&Path>) -> Result<(PathBuf, Config)> {
    let Some(path) = find_config_file(explicit_path)? else {
        anyhow::bail!(
            "No config file found. Searched:\n\
             - ./bootkit.toml\n\
             - <config dir>/bootkit/bootkit.toml\n\
             - ~/.bootkit.toml"
        );
    };
    let config = load_config(&path)?;
    Ok((path, config))
}

/// Load config if one is found, otherwise fall back to defaults
pub fn load_config_or_default(explicit_path: Option<&Path>) -> Result<Config> {
    match find_config_file(explicit_path)? {
        Some(path) => {
            log::debug!("Loaded config from: {}", path.display());
            load_config(&path)
        }
        None => Ok(Config::default()),
    }
}
