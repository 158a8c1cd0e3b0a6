//! Logging helpers
//!
//! `RUST_LOG` wins over the configured level when both are present.

use std::env;

use log::{warn, LevelFilter};

/// Initialize the logging system
///
/// # Parameters
///
/// * `level` - Log level used when `RUST_LOG` is unset; may be changed later
///   with [`set_log_level`]
pub fn init_logger(level: &str) {
    let env = env_logger::Env::default()
        .filter_or("RUST_LOG", "trace");

    // A second initialisation (tests, embedding callers) is not an error here.
    let _ = env_logger::Builder::from_env(env).try_init();
    set_log_level(level);
}

/// Change the active log level, unless `RUST_LOG` is set
pub fn set_log_level(level: &str) {
    if env::var_os("RUST_LOG").is_some() {
        return;
    }

    match level.parse::<LevelFilter>() {
        Ok(filter) => log::set_max_level(filter),
        Err(_) => warn!("Invalid log level: {}, keeping {}", level, log::max_level()),
    }
}
