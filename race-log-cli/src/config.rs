//! Configuration loading and parsing

use anyhow::{bail, Context, Result};
use race_log_core::{RaceConfig, RaceSettings};
use std::fs;
use std::path::Path;

/// Load and validate race configuration from a JSON or TOML file
pub fn load_config(path: &Path) -> Result<RaceConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());

    let settings: RaceSettings = match extension.as_deref() {
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?,
        Some("toml") => toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?,
        other => bail!("Unsupported config format {:?} for {:?} (expected .json or .toml)", other, path),
    };

    log::debug!("Race settings: {:?}", settings);

    let config = RaceConfig::try_from(settings)
        .with_context(|| format!("Invalid configuration in {:?}", path))?;

    Ok(config)
}
