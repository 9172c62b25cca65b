//! Configuration loading and management.
//!
//! Configuration is loaded from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Command-line arguments
//! 2. Environment variables (read through the matching command-line argument)
//! 3. `.csv2sql.toml` in current directory
//! 4. `~/.config/csv2sql/config.toml`
//! 5. Default values
//!
//! # Configuration File Format
//!
//! ```toml
//! [convert]
//! table = "people"
//!
//! [report]
//! enabled = false
//! format = "text"              # text, json, yaml
//! colored = true
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `CSV2SQL_TABLE` | Table name (`--table`) |
//! | `CSV2SQL_STATS_FORMAT` | Summary format (`--stats-format`) |

use std::{
    env, fs,
    path::{Path, PathBuf}
};

use serde::Deserialize;

use crate::{
    error::{AppResult, config_error},
    output::ReportFormat
};

/// Table name used when none is configured
pub const DEFAULT_TABLE_NAME: &str = "csv2sql";

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub convert: ConvertConfig,
    #[serde(default)]
    pub report:  ReportConfig
}

/// Conversion configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConvertConfig {
    /// Table name for `CREATE TABLE` and `INSERT INTO`
    pub table: Option<String>
}

/// Conversion summary configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub format:  ReportFormat,
    #[serde(default = "default_colored")]
    pub colored: bool
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            format:  ReportFormat::Text,
            colored: true
        }
    }
}

fn default_colored() -> bool {
    true
}

impl Config {
    /// Load configuration from files
    ///
    /// Priority (highest to lowest):
    /// 1. Config file in current directory (.csv2sql.toml)
    /// 2. Config file in home directory (~/.config/csv2sql/config.toml)
    /// 3. Default values
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(home) = env::var_os("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("csv2sql")
                .join("config.toml");

            if home_config.exists() {
                config = Self::from_file(&home_config)?;
            }
        }

        // Current directory config overrides home config
        let local_config = PathBuf::from(".csv2sql.toml");
        if local_config.exists() {
            config = Self::from_file(&local_config)?;
        }

        Ok(config)
    }

    /// Parse a single configuration file
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            config_error(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| config_error(format!("Invalid config file: {}", e)))
    }

    /// Table name from configuration, or the built-in default
    pub fn table_name(&self) -> &str {
        self.convert.table.as_deref().unwrap_or(DEFAULT_TABLE_NAME)
    }
}
