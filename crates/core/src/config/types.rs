use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    pub version: u32,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// The external note store invoked for reading templates and creating notes.
#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Program name or path (defaults to `nb` on PATH).
    #[serde(default = "default_store_program")]
    pub program: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { program: default_store_program() }
    }
}

fn default_store_program() -> String {
    "nb".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file_level: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), file_level: None, file: None }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Config file the values came from; `None` when built-in defaults were used.
    pub source: Option<PathBuf>,
    pub store_program: String,
    pub logging: LoggingConfig,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            source: None,
            store_program: default_store_program(),
            logging: LoggingConfig::default(),
        }
    }
}
