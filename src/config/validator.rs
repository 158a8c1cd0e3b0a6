//! Configuration validator

use log::warn;

use crate::algorithm::AlgorithmCategory;
use crate::config::error::{ConfigError, Result};
use crate::config::types::{AllowLists, MatrixConfig};

/// Validate the configuration
pub fn validate_config(config: &MatrixConfig) -> Result<()> {
    validate_general_settings(config)?;
    validate_allow_lists(&config.allow_lists)?;

    Ok(())
}

fn validate_general_settings(config: &MatrixConfig) -> Result<()> {
    match config.log_level() {
        "error" | "warn" | "info" | "debug" | "trace" => {}
        level => {
            warn!("Invalid log level: {}. Using default: info", level);
        }
    }

    if config.output_marker.trim().is_empty() {
        return Err(ConfigError::InvalidValue(
            "output_marker".to_string(),
            "Output marker must not be empty".to_string()
        ));
    }

    if config.ansible_bin.trim().is_empty() {
        return Err(ConfigError::InvalidValue(
            "ansible_bin".to_string(),
            "Ansible executable must not be empty".to_string()
        ));
    }

    Ok(())
}

/// Names are matched against whitespace-split tokens, so they can never contain whitespace
fn validate_allow_lists(lists: &AllowLists) -> Result<()> {
    for category in AlgorithmCategory::ALL {
        for name in lists.get(category).iter() {
            if name.is_empty() || name.chars().any(char::is_whitespace) {
                return Err(ConfigError::InvalidValue(
                    AllowLists::key(category).to_string(),
                    format!("Invalid algorithm name: {:?}", name)
                ));
            }
        }
    }

    Ok(())
}
