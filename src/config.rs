// Configuration for revchonk
use crate::types::{Result, RevchonkError};
use log::debug;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV_VAR: &str = "REVCHONK_CONFIG";
pub const LOCAL_CONFIG_FILE: &str = "revchonk.toml";

// Defaults
pub const DEFAULT_MARKER: &str = "REVROW";
pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_GROUP_BY: &str = "Service";
pub const DEFAULT_MAX_INPUT_BYTES: usize = 32 * 1024 * 1024;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RevchonkConfig {
    #[serde(default)]
    pub dedupe: DedupeConfig,
    #[serde(default)]
    pub recognizer: RecognizerConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub csv: CsvColumns,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DedupeConfig {
    /// Adds `service` to the identity key.
    #[serde(default)]
    pub include_service_in_key: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RecognizerConfig {
    #[serde(default = "default_marker")]
    pub marker: String,
    #[serde(default = "default_true")]
    pub parentheses_as_negative: bool,
    #[serde(default)]
    pub tabbed_lines: bool,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            marker: default_marker(),
            parentheses_as_negative: true,
            tabbed_lines: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReportConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_group_by")]
    pub group_by: String,
    /// 0 disables the size guard.
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            group_by: default_group_by(),
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

/// Header names the CSV path reads its fields from.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CsvColumns {
    #[serde(default = "default_code_column")]
    pub code_column: String,
    #[serde(default = "default_service_column")]
    pub service_column: String,
    #[serde(default = "default_start_column")]
    pub start_column: String,
    #[serde(default = "default_end_column")]
    pub end_column: String,
    #[serde(default = "default_revenue_column")]
    pub revenue_column: String,
}

impl Default for CsvColumns {
    fn default() -> Self {
        Self {
            code_column: default_code_column(),
            service_column: default_service_column(),
            start_column: default_start_column(),
            end_column: default_end_column(),
            revenue_column: default_revenue_column(),
        }
    }
}

fn default_true() -> bool { true }
fn default_marker() -> String { DEFAULT_MARKER.to_string() }
fn default_top_n() -> usize { DEFAULT_TOP_N }
fn default_group_by() -> String { DEFAULT_GROUP_BY.to_string() }
fn default_max_input_bytes() -> usize { DEFAULT_MAX_INPUT_BYTES }
fn default_code_column() -> String { "code".to_string() }
fn default_service_column() -> String { "service".to_string() }
fn default_start_column() -> String { "subCountStart".to_string() }
fn default_end_column() -> String { "subCountEnd".to_string() }
fn default_revenue_column() -> String { "revenue".to_string() }

impl RevchonkConfig {
    /// Resolve and load the config file. `explicit` wins, then `REVCHONK_CONFIG`,
    /// then `./revchonk.toml`, then the user config dir. Nothing found means defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match Self::locate(explicit) {
            Some(path) => Self::from_file(&path),
            None => {
                debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            RevchonkError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        debug!("loaded config from {}", path.display());
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| RevchonkError::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| RevchonkError::Config(e.to_string()))
    }

    fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            // An explicit path that doesn't exist should fail loudly in from_file
            return Some(path.to_path_buf());
        }
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(path));
        }
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Some(local);
        }
        user_config_path().filter(|p| p.is_file())
    }
}

// Per-user config location, e.g. ~/.config/revchonk/config.toml
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("revchonk").join("config.toml"))
}
