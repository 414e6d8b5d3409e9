//! Configuration management for the ledger shell

use crate::error::ChainError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "merkle-ledger.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cli: CliConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    #[serde(default = "default_prompt")]
    pub prompt: String,
    #[serde(default = "default_show_help")]
    pub show_help: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            show_help: default_show_help(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl LoggingConfig {
    pub fn max_level(&self) -> Result<tracing::Level, ChainError> {
        self.level
            .parse()
            .map_err(|_| ChainError::ConfigError(format!("unknown logging.level '{}'", self.level)))
    }
}

fn default_prompt() -> String {
    "Enter command: ".to_string()
}

fn default_show_help() -> bool {
    true
}

fn default_level() -> String {
    "warn".to_string()
}

/// Loads `path`, falling back to defaults when the file does not exist.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ChainError> {
    let config_str = match fs::read_to_string(path.as_ref()) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };
    let config: Config = if config_str.trim().is_empty() {
        Config::default()
    } else {
        toml::from_str(&config_str)?
    };

    // Validate critical values
    if config.cli.prompt.is_empty() {
        return Err(ChainError::ConfigError("cli.prompt must not be empty".to_string()));
    }
    config.logging.max_level()?;

    Ok(config)
}
