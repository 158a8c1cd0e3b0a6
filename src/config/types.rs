//! Configuration types
//!
//! This module contains the configuration types used throughout the application.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::algorithm::{AlgorithmCategory, AllowList};
use crate::config::defaults;
use crate::config::error::{ConfigError, Result};

/// What to do when the DUT cannot be queried for a category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure and emit an empty matrix for the category
    Degrade,
    /// Propagate the failure to the caller
    Fail,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        defaults::on_query_failure()
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Degrade => write!(f, "degrade"),
            FailurePolicy::Fail => write!(f, "fail"),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "degrade" => Ok(Self::Degrade),
            "fail" => Ok(Self::Fail),
            _ => Err(ConfigError::InvalidValue(
                "on_query_failure".to_string(),
                format!("Invalid failure policy: {}. Valid values are: degrade, fail", s)
            )),
        }
    }
}

/// Statically configured allow-lists, one per category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AllowLists {
    pub enc_ciphers: AllowList,
    pub macs: AllowList,
    pub kexs: AllowList,
}

impl Default for AllowLists {
    fn default() -> Self {
        Self {
            enc_ciphers: defaults::enc_ciphers(),
            macs: defaults::macs(),
            kexs: defaults::kexs(),
        }
    }
}

impl AllowLists {
    /// Allow-list for one category
    pub fn get(&self, category: AlgorithmCategory) -> &AllowList {
        match category {
            AlgorithmCategory::EncryptionCipher => &self.enc_ciphers,
            AlgorithmCategory::MessageAuthenticationCode => &self.macs,
            AlgorithmCategory::KeyExchange => &self.kexs,
        }
    }

    /// Config key of a category's list, as used in files and environment variables
    pub fn key(category: AlgorithmCategory) -> &'static str {
        match category {
            AlgorithmCategory::EncryptionCipher => "allow_lists.enc_ciphers",
            AlgorithmCategory::MessageAuthenticationCode => "allow_lists.macs",
            AlgorithmCategory::KeyExchange => "allow_lists.kexs",
        }
    }
}

/// Matrix generation configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MatrixConfig {
    /// Log level
    pub log_level: String,

    /// Name of the testbed whose first DUT is queried
    pub testbed: Option<String>,

    /// Testbed definition file (CSV or JSON)
    pub testbed_file: PathBuf,

    /// Directory holding the ansible inventory files
    pub inventory_dir: PathBuf,

    /// Ansible executable
    pub ansible_bin: String,

    /// Marker preceding the algorithm list in the command output
    pub output_marker: String,

    /// Behaviour when a DUT query fails
    pub on_query_failure: FailurePolicy,

    /// Statically permitted algorithms
    pub allow_lists: AllowLists,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level(),
            testbed: None,
            testbed_file: defaults::testbed_file(),
            inventory_dir: defaults::inventory_dir(),
            ansible_bin: defaults::ansible_bin(),
            output_marker: defaults::output_marker(),
            on_query_failure: FailurePolicy::default(),
            allow_lists: AllowLists::default(),
        }
    }
}

impl MatrixConfig {
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    pub fn testbed_file(&self) -> &Path {
        &self.testbed_file
    }

    pub fn inventory_dir(&self) -> &Path {
        &self.inventory_dir
    }

    /// Testbed name, which is required before the DUT can be queried
    pub fn require_testbed(&self) -> Result<&str> {
        self.testbed
            .as_deref()
            .ok_or_else(|| ConfigError::MissingRequiredValue("testbed".to_string()))
    }
}
