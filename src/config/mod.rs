mod defaults;
mod types;

pub use types::*;

use crate::error::ConfigError;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

impl Config {
    /// Load config from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load config if the file exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!("Config file {:?} not found, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for parser in &self.project.git.release_notes.parsers {
            if !seen.insert(parser.title.to_lowercase()) {
                return Err(ConfigError::DuplicateParser(parser.title.clone()));
            }
        }
        Ok(())
    }
}

/// Coerce the common truthy/falsy spellings of a boolean option
pub fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "on" => Ok(true),
        "false" | "0" | "no" | "n" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidBool(value.to_string())),
    }
}
