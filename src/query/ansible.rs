//! Ansible-backed remote executor
//!
//! Runs `ansible -m shell -i <inventory> <host> -a <command>` and captures its
//! stdout and stderr separately.

use std::process::Command;

use log::debug;

use super::{CommandOutput, QueryTarget, RemoteExecutor};
use crate::common::Result;

/// Issues ad-hoc shell commands through the `ansible` executable
#[derive(Debug, Clone)]
pub struct AnsibleExecutor {
    program: String,
}

impl AnsibleExecutor {
    pub fn new<S: Into<String>>(program: S) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Arguments passed to the ansible executable
    pub fn args(target: &QueryTarget, command: &str) -> Vec<String> {
        vec![
            "-m".to_string(),
            "shell".to_string(),
            "-i".to_string(),
            target.inventory.display().to_string(),
            target.host.clone(),
            "-a".to_string(),
            command.to_string(),
        ]
    }
}

impl Default for AnsibleExecutor {
    fn default() -> Self {
        Self::new(crate::config::defaults::ANSIBLE_BIN_STR)
    }
}

impl RemoteExecutor for AnsibleExecutor {
    fn run(&self, target: &QueryTarget, command: &str) -> Result<CommandOutput> {
        let args = Self::args(target, command);
        debug!("cmd: {} {:?}", self.program, args);

        let output = Command::new(&self.program).args(&args).output()?;

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
