//! Remote query executor
//!
//! Asks a DUT which algorithms of a category its SSH service supports. The
//! transport sits behind [`RemoteExecutor`]; [`AnsibleExecutor`] is the
//! shipped implementation.

mod ansible;
mod parser;

use std::path::PathBuf;

use log::{debug, error, info};

use crate::algorithm::AlgorithmCategory;
use crate::common::{MatrixError, Result};

pub use ansible::AnsibleExecutor;
pub use parser::parse_algorithm_list;

/// Device a remote command is sent to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTarget {
    /// Inventory file describing the device
    pub inventory: PathBuf,
    /// Host name within the inventory
    pub host: String,
}

impl QueryTarget {
    pub fn new<P: Into<PathBuf>, S: Into<String>>(inventory: P, host: S) -> Self {
        Self {
            inventory: inventory.into(),
            host: host.into(),
        }
    }
}

/// Result of one remote command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was killed by a signal
    pub status: Option<i32>,
    pub stdout: String,
    /// Transport warnings and errors, never parsed for algorithm names
    pub stderr: String,
}

impl CommandOutput {
    /// Successful command with nothing on stderr
    pub fn ok<S: Into<String>>(stdout: S) -> Self {
        Self {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Stdout followed by stderr, for error reports
    pub fn combined(&self) -> String {
        if self.stderr.is_empty() {
            return self.stdout.clone();
        }
        format!("{}{}", self.stdout, self.stderr)
    }
}

/// Runs a shell command on a remote device
///
/// Implementations block until the command finishes. Timeouts are left to the
/// underlying transport.
#[cfg_attr(test, mockall::automock)]
pub trait RemoteExecutor: Send + Sync {
    /// Run `command` on `target`
    ///
    /// An `Err` means the command could not be issued at all; a command that
    /// ran and failed is reported through [`CommandOutput::status`].
    fn run(&self, target: &QueryTarget, command: &str) -> Result<CommandOutput>;
}

/// Query the algorithms a DUT supports for one category
///
/// Makes a single attempt. Returns the names in the order the device reported
/// them; an empty list is a valid answer.
pub fn query_supported_algorithms(
    executor: &dyn RemoteExecutor,
    target: &QueryTarget,
    category: AlgorithmCategory,
    marker: &str,
) -> Result<Vec<String>> {
    let command = category.query_command();
    debug!("Querying {} on {} with: {}", category, target.host, command);

    let output = match executor.run(target, command) {
        Ok(output) => output,
        Err(e) => {
            error!("Failed to run {} query on {}: {}", category, target.host, e);
            return Err(MatrixError::RemoteQuery {
                category,
                output: e.to_string(),
            });
        }
    };

    if !output.success() {
        error!(
            "Failed to get DUT's {} full list (status {:?}): {}",
            category, output.status, output.combined()
        );
        return Err(MatrixError::RemoteQuery {
            category,
            output: output.combined(),
        });
    }

    if !output.stderr.is_empty() {
        debug!("{} query on {} wrote to stderr: {}", category, target.host, output.stderr.trim_end());
    }

    match parse_algorithm_list(&output.stdout, marker) {
        Some(algorithms) => {
            info!("{} full list: {:?}", category, algorithms);
            Ok(algorithms)
        }
        None => {
            error!("No '{}' marker in DUT's {} output: {}", marker, category, output.combined());
            Err(MatrixError::RemoteQuery {
                category,
                output: output.combined(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::{always, eq};

    fn target() -> QueryTarget {
        QueryTarget::new("../ansible/veos_vtb", "vlab-01")
    }

    #[test]
    fn test_query_parses_tokens_after_marker() {
        let mut executor = MockRemoteExecutor::new();
        executor
            .expect_run()
            .with(always(), eq("ssh -Q kex"))
            .times(1)
            .returning(|_, _| Ok(CommandOutput::ok(
                "vlab-01 | CHANGED | rc=0 >>\ncurve25519-sha256\necdh-sha2-nistp384\n",
            )));

        let algorithms = query_supported_algorithms(
            &executor, &target(), AlgorithmCategory::KeyExchange, "rc=0 >>",
        ).unwrap();

        assert_eq!(algorithms, vec!["curve25519-sha256", "ecdh-sha2-nistp384"]);
    }

    #[test]
    fn test_query_non_zero_exit() {
        let mut executor = MockRemoteExecutor::new();
        executor.expect_run().times(1).returning(|_, _| Ok(CommandOutput {
            status: Some(2),
            stdout: "vlab-01 | UNREACHABLE! => {}".to_string(),
            stderr: String::new(),
        }));

        let err = query_supported_algorithms(
            &executor, &target(), AlgorithmCategory::EncryptionCipher, "rc=0 >>",
        ).unwrap_err();

        match err {
            MatrixError::RemoteQuery { category, output } => {
                assert_eq!(category, AlgorithmCategory::EncryptionCipher);
                assert!(output.contains("UNREACHABLE"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_query_missing_marker() {
        let mut executor = MockRemoteExecutor::new();
        executor.expect_run().returning(|_, _| Ok(CommandOutput::ok("aes256-ctr aes128-ctr")));

        let result = query_supported_algorithms(
            &executor, &target(), AlgorithmCategory::EncryptionCipher, "rc=0 >>",
        );
        assert!(matches!(result, Err(MatrixError::RemoteQuery { .. })));
    }

    #[test]
    fn test_query_ignores_stderr_warnings() {
        let mut executor = MockRemoteExecutor::new();
        executor.expect_run().returning(|_, _| Ok(CommandOutput {
            status: Some(0),
            stdout: "vlab-01 | CHANGED | rc=0 >>\naes256-ctr\n".to_string(),
            stderr: "[WARNING]: Platform linux on host vlab-01 is using the discovered Python interpreter\n".to_string(),
        }));

        let algorithms = query_supported_algorithms(
            &executor, &target(), AlgorithmCategory::EncryptionCipher, "rc=0 >>",
        ).unwrap();

        assert_eq!(algorithms, vec!["aes256-ctr"]);
    }

    #[test]
    fn test_query_failure_reports_stderr() {
        let mut executor = MockRemoteExecutor::new();
        executor.expect_run().returning(|_, _| Ok(CommandOutput {
            status: Some(1),
            stdout: String::new(),
            stderr: "ERROR! the inventory file could not be parsed\n".to_string(),
        }));

        match query_supported_algorithms(&executor, &target(), AlgorithmCategory::KeyExchange, "rc=0 >>") {
            Err(MatrixError::RemoteQuery { output, .. }) => assert!(output.contains("could not be parsed")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_query_transport_error() {
        let mut executor = MockRemoteExecutor::new();
        executor.expect_run().returning(|_, _| {
            Err(MatrixError::Other("ansible: command not found".to_string()))
        });

        let result = query_supported_algorithms(
            &executor, &target(), AlgorithmCategory::MessageAuthenticationCode, "rc=0 >>",
        );
        assert!(matches!(
            result,
            Err(MatrixError::RemoteQuery { category: AlgorithmCategory::MessageAuthenticationCode, .. })
        ));
    }
}
