//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::{BalancerConfig, CliOverrides};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration from a TOML file, apply command-line overrides, and
/// validate the result.
///
/// Overrides are applied before validation so a config file with an empty
/// backend list still works when `--backends` is supplied.
pub fn load_config(path: &Path, overrides: &CliOverrides) -> Result<BalancerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let mut config: BalancerConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    config.apply_overrides(overrides);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
