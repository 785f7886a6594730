//! Configuration.
//!
//! Resolves the base directory loadouts live in and reads the optional
//! `config.toml` inside it.
//!
//! Base directory priority:
//! 1. explicit override (`--dir` / `LOADOUT_DIR`)
//! 2. `$XDG_DATA_HOME/loadout`
//! 3. `~/.loadout`

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::constants;
use crate::error::{ConfigError, Result};

/// Settings read from `<base>/config.toml`.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Editor used when `$EDITOR` is unset.
    pub editor: Option<String>,
    /// Encryption tool settings.
    pub sops: SopsSettings,
}

/// `[sops]` table.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SopsSettings {
    /// Path or name of the sops binary.
    pub binary: Option<String>,
    /// Extra arguments passed before the file path.
    pub args: Vec<String>,
}

impl Settings {
    /// Load settings from `<base>/config.toml`, defaulting when absent.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the file exists but is malformed.
    pub fn load(base: &Path) -> Result<Self> {
        let path = base.join(constants::CONFIG_FILE);
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)?;
        let settings: Self = toml::from_str(&contents).map_err(ConfigError::Parse)?;
        debug!(path = %path.display(), "config loaded");
        Ok(settings)
    }

    /// Editor command: `$EDITOR`, then config, then `vi`.
    pub fn editor(&self) -> String {
        std::env::var("EDITOR")
            .ok()
            .filter(|e| !e.trim().is_empty())
            .or_else(|| self.editor.clone())
            .unwrap_or_else(|| constants::DEFAULT_EDITOR.to_string())
    }
}

/// Resolve the base directory.
///
/// `explicit` is the `--dir` flag, which clap already fills from
/// `LOADOUT_DIR`.
///
/// # Errors
///
/// Returns `ConfigError::NoHomeDir` when nothing else applies and the home
/// directory is unknown.
pub fn base_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }

    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(xdg).join(constants::APP_DIR));
    }

    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(constants::HOME_DIR))
}
