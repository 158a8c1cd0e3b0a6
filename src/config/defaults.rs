//! Default configuration values
//!
//! This module is the single source of truth for defaults, shared by the
//! serde defaults, the layered loader and the command line.

use std::path::PathBuf;

use crate::algorithm::AllowList;
use super::types::FailurePolicy;

/// Environment variable prefix for all configuration options
pub const ENV_PREFIX: &str = "SSH_ALGO_MATRIX_";

/// Separator between nested keys in environment variable names
pub const ENV_NESTED_SEPARATOR: &str = "__";

/// Separator between list items in environment variable values
pub const ENV_LIST_SEPARATOR: &str = ",";

/// Default log level as string
pub const LOG_LEVEL_STR: &str = "info";

/// Default testbed file
pub const TESTBED_FILE_STR: &str = "testbed.csv";

/// Default directory holding the ansible inventories
pub const INVENTORY_DIR_STR: &str = "../ansible";

/// Default ansible executable
pub const ANSIBLE_BIN_STR: &str = "ansible";

/// Marker ansible prints before the shell module's output on success
pub const OUTPUT_MARKER_STR: &str = "rc=0 >>";

/// Encryption ciphers permitted out of the box
pub const ENC_CIPHERS: [&str; 3] = [
    "aes256-gcm@openssh.com",
    "aes256-ctr",
    "aes192-ctr",
];

/// MACs permitted out of the box
pub const MACS: [&str; 2] = [
    "hmac-sha2-512-etm@openssh.com",
    "hmac-sha2-256-etm@openssh.com",
];

/// Key exchange methods permitted out of the box
pub const KEXS: [&str; 2] = [
    "ecdh-sha2-nistp384",
    "ecdh-sha2-nistp521",
];

/// Default log level
pub fn log_level() -> String {
    LOG_LEVEL_STR.to_string()
}

/// Default testbed file path
pub fn testbed_file() -> PathBuf {
    PathBuf::from(TESTBED_FILE_STR)
}

/// Default inventory directory
pub fn inventory_dir() -> PathBuf {
    PathBuf::from(INVENTORY_DIR_STR)
}

/// Default ansible executable
pub fn ansible_bin() -> String {
    ANSIBLE_BIN_STR.to_string()
}

/// Default output marker
pub fn output_marker() -> String {
    OUTPUT_MARKER_STR.to_string()
}

/// Default behaviour when a DUT query fails
pub fn on_query_failure() -> FailurePolicy {
    FailurePolicy::Degrade
}

pub fn enc_ciphers() -> AllowList {
    AllowList::new(ENC_CIPHERS)
}

pub fn macs() -> AllowList {
    AllowList::new(MACS)
}

pub fn kexs() -> AllowList {
    AllowList::new(KEXS)
}
