//! IP-in-IP decapsulation test support
//!
//! Device access, template rendering and the mux simulator are external; they
//! sit behind [`DeviceHost`], [`DecapRenderer`] and [`MuxControl`]. This module sequences the swss
//! commands, scopes configuration changes with drop guards, and builds the
//! parameters handed to the packet-test harness.

mod commands;
mod guard;
mod mux;
mod params;

use std::fmt;

use crate::common::Result;

pub use commands::{apply_cmds, remove_default_cmds, restore_default_cmd, swss_container, DEFAULT_IPINIP_CONFIG};
pub use guard::{apply_decap_cfg, DecapConfigGuard, DefaultDecapGuard};
pub use mux::{is_dualtor, set_mux_random, set_mux_side, MuxControl, MuxResponse, MuxSide};
pub use params::{
    decap_log_file, ecn_mode, settle_time, uniform_mode_supported, DecapConfigVars, DecapSetup,
    DecapTestParams, IpVersions, LoopbackAddrs, PtfInvocation, TtlDscpParams, MAX_FIB_INFO_FILES,
    PTFRUNNER_QLEN,
};

/// Operation carried by a swss configuration payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecapOp {
    Set,
    Del,
}

impl fmt::Display for DecapOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecapOp::Set => write!(f, "SET"),
            DecapOp::Del => write!(f, "DEL"),
        }
    }
}

/// A DUT that shell commands and files can be pushed to
pub trait DeviceHost {
    fn hostname(&self) -> &str;

    /// Frontend ASIC ids; `None` stands for the single ASIC of a non multi-ASIC device
    fn frontend_asic_ids(&self) -> Vec<Option<u32>>;

    /// Run one shell command, failing on a non-zero exit
    fn shell(&self, cmd: &str) -> Result<()>;

    /// Run commands in order, stopping at the first failure
    fn shell_cmds(&self, cmds: &[String]) -> Result<()> {
        for cmd in cmds {
            self.shell(cmd)?;
        }
        Ok(())
    }

    /// Write `content` to `dest` on the device
    fn copy_content(&self, content: &str, dest: &str) -> Result<()>;
}

/// Renders the decap configuration template
pub trait DecapRenderer {
    fn render(&self, vars: &DecapConfigVars) -> Result<String>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;

    use super::*;
    use crate::common::MatrixError;

    /// Records every command and copy, optionally failing commands containing a pattern
    pub struct RecordingHost {
        pub name: String,
        pub asics: Vec<Option<u32>>,
        pub log: RefCell<Vec<String>>,
        pub fail_on: Option<String>,
    }

    impl RecordingHost {
        pub fn new(name: &str, asics: Vec<Option<u32>>) -> Self {
            Self {
                name: name.to_string(),
                asics,
                log: RefCell::new(Vec::new()),
                fail_on: None,
            }
        }

        pub fn log(&self) -> Vec<String> {
            self.log.borrow().clone()
        }
    }

    impl DeviceHost for RecordingHost {
        fn hostname(&self) -> &str {
            &self.name
        }

        fn frontend_asic_ids(&self) -> Vec<Option<u32>> {
            self.asics.clone()
        }

        fn shell(&self, cmd: &str) -> Result<()> {
            self.log.borrow_mut().push(cmd.to_string());
            match &self.fail_on {
                Some(pattern) if cmd.contains(pattern.as_str()) => Err(MatrixError::Device {
                    host: self.name.clone(),
                    message: format!("command failed: {}", cmd),
                }),
                _ => Ok(()),
            }
        }

        fn copy_content(&self, content: &str, dest: &str) -> Result<()> {
            self.log.borrow_mut().push(format!("copy {} <- {}", dest, content));
            Ok(())
        }
    }

    /// Renders the variables as JSON
    pub struct JsonRenderer;

    impl DecapRenderer for JsonRenderer {
        fn render(&self, vars: &DecapConfigVars) -> Result<String> {
            Ok(serde_json::to_string(vars)?)
        }
    }
}
