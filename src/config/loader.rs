//! Configuration loading functionality
//!
//! Sources are layered lowest to highest: defaults, JSON file, environment
//! variables, then command line overrides.

use std::path::{Path, PathBuf};

use ::config::{Config, Environment, File, FileFormat};
use log::{debug, info};

use crate::config::defaults::{ENV_NESTED_SEPARATOR, ENV_PREFIX};
use crate::config::error::{ConfigError, Result};
use crate::config::types::{FailurePolicy, MatrixConfig};

/// Trait for loading configuration from different sources
pub trait ConfigLoader {
    /// Load configuration from a JSON file layered over the defaults
    fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> where Self: Sized;

    /// Load configuration from environment variables layered over the defaults
    fn from_env() -> Result<Self> where Self: Sized;

    /// Load defaults, then the optional file, then environment variables
    fn load(file: Option<&Path>) -> Result<Self> where Self: Sized;
}

impl ConfigLoader for MatrixConfig {
    fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        build(Some(path.as_ref()), false)
    }

    fn from_env() -> Result<Self> {
        build(None, true)
    }

    fn load(file: Option<&Path>) -> Result<Self> {
        build(file, true)
    }
}

/// Environment values stay strings; allow-lists split themselves on deserialize
fn environment_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX.trim_end_matches('_'))
        .prefix_separator("_")
        .separator(ENV_NESTED_SEPARATOR)
}

fn build(file: Option<&Path>, with_env: bool) -> Result<MatrixConfig> {
    let defaults = Config::try_from(&MatrixConfig::default())?;
    let mut builder = Config::builder().add_source(defaults);

    if let Some(path) = file {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        info!("Loading configuration from {}", path.display());
        builder = builder.add_source(File::from(path).format(FileFormat::Json).required(true));
    }

    if with_env {
        debug!("Applying environment variables with prefix {}", ENV_PREFIX);
        builder = builder.add_source(environment_source());
    }

    let config: MatrixConfig = builder.build()?.try_deserialize()?;
    Ok(config)
}

/// Values given on the command line, which take precedence over every other source
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub testbed: Option<String>,
    pub testbed_file: Option<PathBuf>,
    pub inventory_dir: Option<PathBuf>,
    pub on_query_failure: Option<FailurePolicy>,
}

impl ConfigOverrides {
    /// Apply the overrides that are set
    pub fn apply(self, mut config: MatrixConfig) -> MatrixConfig {
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if let Some(testbed) = self.testbed {
            config.testbed = Some(testbed);
        }
        if let Some(path) = self.testbed_file {
            config.testbed_file = path;
        }
        if let Some(path) = self.inventory_dir {
            config.inventory_dir = path;
        }
        if let Some(policy) = self.on_query_failure {
            config.on_query_failure = policy;
        }
        config
    }
}
