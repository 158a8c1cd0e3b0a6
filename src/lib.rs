//! SSH algorithm compliance matrices for network switch testbeds
//!
//! Asks a device under test (DUT) which SSH ciphers, MACs and key exchange
//! methods it supports, reconciles the answer against configured allow-lists,
//! and emits the test cases a runner instantiates. Algorithms the DUT offers
//! but the allow-list does not name become expected-failure cases instead of
//! being dropped.
//!
//! # Example
//!
//! ```no_run
//! use ssh_algo_matrix::config::{ConfigLoader, MatrixConfig};
//! use ssh_algo_matrix::GenerationSession;
//!
//! fn main() -> ssh_algo_matrix::Result<()> {
//!     let config = MatrixConfig::load(None)?;
//!     let mut session = GenerationSession::from_config(&config)?;
//!
//!     if let Some(matrix) = session.generate_tests(&["duthost", "enum_dut_ssh_kex"])? {
//!         println!("{}", serde_json::to_string_pretty(&matrix)?);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! The [`decap`] module carries the scoped setup and harness parameters of the
//! IP-in-IP decapsulation test.

pub mod algorithm;
pub mod common;
pub mod config;
pub mod decap;
pub mod matrix;
pub mod query;
pub mod reconcile;
pub mod session;
pub mod testbed;

// Re-export commonly used structures and functions for convenience
pub use algorithm::{AlgorithmCategory, AllowList};
pub use common::{MatrixError, Result};
pub use matrix::{TestCase, TestMatrix};
pub use reconcile::{Expectation, ReconciledParameter};
pub use session::GenerationSession;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
