//! SSH algorithm categories

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::MatrixError;

/// Kind of SSH algorithm a test matrix is generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlgorithmCategory {
    /// Symmetric encryption ciphers (`ssh -Q cipher`)
    #[serde(rename = "enc")]
    EncryptionCipher,
    /// Message authentication codes (`ssh -Q mac`)
    #[serde(rename = "mac")]
    MessageAuthenticationCode,
    /// Key exchange methods (`ssh -Q kex`)
    #[serde(rename = "kex")]
    KeyExchange,
}

impl AlgorithmCategory {
    /// All categories, in parameter dispatch order
    pub const ALL: [AlgorithmCategory; 3] = [
        AlgorithmCategory::EncryptionCipher,
        AlgorithmCategory::MessageAuthenticationCode,
        AlgorithmCategory::KeyExchange,
    ];

    /// Command run on the DUT to list the algorithms it supports
    pub fn query_command(self) -> &'static str {
        match self {
            Self::EncryptionCipher => "ssh -Q cipher",
            Self::MessageAuthenticationCode => "ssh -Q mac",
            Self::KeyExchange => "ssh -Q kex",
        }
    }

    /// Test parameter name a test declares to receive this category
    pub fn parameter_name(self) -> &'static str {
        match self {
            Self::EncryptionCipher => "enum_dut_ssh_enc_cipher",
            Self::MessageAuthenticationCode => "enum_dut_ssh_mac",
            Self::KeyExchange => "enum_dut_ssh_kex",
        }
    }

    /// Map a test parameter name back to its category
    pub fn from_parameter_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.parameter_name() == name)
    }

    /// Short name used in logs, config keys and metric labels
    pub fn short_name(self) -> &'static str {
        match self {
            Self::EncryptionCipher => "enc",
            Self::MessageAuthenticationCode => "mac",
            Self::KeyExchange => "kex",
        }
    }
}

impl fmt::Display for AlgorithmCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for AlgorithmCategory {
    type Err = MatrixError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "enc" | "cipher" => Ok(Self::EncryptionCipher),
            "mac" => Ok(Self::MessageAuthenticationCode),
            "kex" => Ok(Self::KeyExchange),
            other => Self::from_parameter_name(other).ok_or_else(|| {
                MatrixError::Other(format!(
                    "Unknown algorithm category: {}. Valid values are: enc, mac, kex",
                    s
                ))
            }),
        }
    }
}
