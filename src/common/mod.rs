//! Common module
//!
//! This module contains the error type and logging helpers shared across the crate.

pub mod error;
pub mod log;

// Re-export commonly used types and functions
pub use self::error::{MatrixError, Result};
pub use self::log::{init_logger, set_log_level};
