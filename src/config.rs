//! Loading the engine configuration from TOML.
//!
//! An explicit `--config FILE` must exist and parse. Without one, the user's
//! `config.toml` in the platform config dir is used if present, and the
//! built-in defaults otherwise.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use gridstore_core::EngineConfig;
use serde::Deserialize;

use crate::error::{Result, ScriptError};

/// Layout of `config.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    sheet: EngineConfig,
}

pub fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "gridstore")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

/// Parse a config document.
pub fn parse_config(text: &str) -> Result<EngineConfig> {
    let file: ConfigFile = toml::from_str(text).map_err(|e| ScriptError::Config(e.to_string()))?;
    file.sheet
        .validate()
        .map_err(|e| ScriptError::Config(e.to_string()))?;
    Ok(file.sheet)
}

pub fn load_config(explicit: Option<&Path>) -> Result<EngineConfig> {
    if let Some(path) = explicit {
        let text = std::fs::read_to_string(path)?;
        return parse_config(&text);
    }
    match user_config_path() {
        Some(path) if path.exists() => {
            tracing::debug!(path = %path.display(), "loading user config");
            let text = std::fs::read_to_string(&path)?;
            parse_config(&text)
        }
        _ => Ok(EngineConfig::default()),
    }
}
