//! Configuration module
//!
//! This module handles application configuration: defaults, the JSON file,
//! environment variables and command line overrides, plus validation.

pub mod defaults;
mod error;
mod loader;
mod types;
mod validator;

pub use self::defaults::ENV_PREFIX;
pub use self::error::{ConfigError, Result};
pub use self::loader::{ConfigLoader, ConfigOverrides};
pub use self::types::{AllowLists, FailurePolicy, MatrixConfig};
pub use self::validator::validate_config;
