//! Configuration file (fenceshot.toml).

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration file structure.
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub renderer: RendererSettings,
    #[serde(default)]
    pub run: RunSettings,
}

/// `[renderer]` table.
#[derive(Debug, Deserialize, PartialEq)]
pub struct RendererSettings {
    #[serde(default = "default_program")]
    pub program: String,
    /// Extra arguments passed to the renderer, e.g. `["--theme", "Nord"]`
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default = "default_keep_temp_files")]
    pub keep_temp_files: bool,
    pub temp_dir: Option<PathBuf>,
}

/// `[run]` table.
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct RunSettings {
    /// Exit nonzero when any block fails to render
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub parallel: bool,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: vec![],
            keep_temp_files: default_keep_temp_files(),
            temp_dir: None,
        }
    }
}

fn default_program() -> String {
    "silicon".to_string()
}
fn default_keep_temp_files() -> bool {
    true
}

/// Errors that can occur when loading the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile, ConfigError> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let config: ConfigFile = toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}
