// Configuration file (YAML)

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_DIR: &str = "tasklist";
const CONFIG_FILE: &str = "config.yml";

/// Which slot storage holds the data
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// One JSON file per slot
    #[default]
    File,
    /// A SQLite database
    Sqlite,
}

/// Settings read from `config.yml`
///
/// Every field is optional in the file; missing fields take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the task data
    pub data_dir: Option<PathBuf>,
    pub backend: Backend,
    /// Colored output
    pub color: bool,
    /// Log level for stderr diagnostics (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            backend: Backend::File,
            color: true,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load configuration
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// used when present and defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::load_from_path(&path),
                _ => {
                    debug!("No config file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: Config =
            serde_yaml::from_str(&content).with_context(|| format!("Failed to parse config file {:?}", path))?;

        debug!(path = ?path, "Loaded config");
        Ok(config)
    }

    /// Data directory to use: the configured one or the platform default
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }
}

/// `<config dir>/tasklist/config.yml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// `<data dir>/tasklist`, or `./.tasklist` when the platform has none
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".tasklist"))
}
