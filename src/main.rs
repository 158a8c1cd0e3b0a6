//! SSH algorithm matrix command line tool
//!
//! Prints the test matrix for one or all algorithm categories as JSON.

use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use log::{error, info};

use ssh_algo_matrix::common::{init_logger, set_log_level, MatrixError, Result};
use ssh_algo_matrix::config::{
    defaults, validate_config, ConfigLoader, ConfigOverrides, FailurePolicy, MatrixConfig,
};
use ssh_algo_matrix::{AlgorithmCategory, GenerationSession, APP_NAME, VERSION};

/// Derive SSH cipher, MAC and key exchange test matrices from a DUT
#[derive(Parser, Debug)]
#[clap(author, version = VERSION, about, long_about = None)]
struct Args {
    /// Testbed whose first DUT is queried
    #[clap(long, env = "SSH_ALGO_MATRIX_TESTBED")]
    testbed: Option<String>,

    /// Testbed file (CSV or JSON)
    #[clap(long)]
    testbed_file: Option<PathBuf>,

    /// Directory holding the ansible inventories
    #[clap(long)]
    inventory_dir: Option<PathBuf>,

    /// Load configuration from a JSON file
    #[clap(long)]
    config_file: Option<PathBuf>,

    /// Log level
    #[clap(long, env = "SSH_ALGO_MATRIX_LOG_LEVEL")]
    log_level: Option<String>,

    /// Test parameter names the test declares (e.g. enum_dut_ssh_mac)
    #[clap(long = "param", conflicts_with_all = ["all", "categories"])]
    params: Vec<String>,

    /// Generate the named categories (enc, mac, kex), printed as a list
    #[clap(long = "category", conflicts_with = "all")]
    categories: Vec<AlgorithmCategory>,

    /// Generate every category
    #[clap(long)]
    all: bool,

    /// What to do when a DUT query fails (degrade, fail)
    #[clap(long, conflicts_with = "strict")]
    on_query_failure: Option<FailurePolicy>,

    /// Same as --on-query-failure fail
    #[clap(long)]
    strict: bool,

    /// Pretty-print the JSON output
    #[clap(long)]
    pretty: bool,
}

fn load_config(args: &Args) -> Result<MatrixConfig> {
    let config = MatrixConfig::load(args.config_file.as_deref())?;

    let overrides = ConfigOverrides {
        log_level: args.log_level.clone(),
        testbed: args.testbed.clone(),
        testbed_file: args.testbed_file.clone(),
        inventory_dir: args.inventory_dir.clone(),
        on_query_failure: args.on_query_failure.or(args.strict.then_some(FailurePolicy::Fail)),
    };
    let config = overrides.apply(config);

    validate_config(&config)?;
    Ok(config)
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

async fn run(args: Args) -> Result<()> {
    // Up before the config is read so loader messages are visible
    init_logger(args.log_level.as_deref().unwrap_or(defaults::LOG_LEVEL_STR));

    let config = load_config(&args)?;
    set_log_level(config.log_level());

    info!("Starting {} v{}", APP_NAME, VERSION);

    let mut session = GenerationSession::from_config(&config)?;

    if args.all {
        let matrices = session.generate_all().await?;
        println!("{}", to_json(&matrices, args.pretty)?);
        return Ok(());
    }

    if !args.categories.is_empty() {
        let mut matrices = Vec::with_capacity(args.categories.len());
        for category in &args.categories {
            matrices.push(session.generate(*category)?);
        }
        println!("{}", to_json(&matrices, args.pretty)?);
        return Ok(());
    }

    if args.params.is_empty() {
        return Err(MatrixError::Config(
            "One of --param, --category or --all must be given".to_string(),
        ));
    }

    match session.generate_tests(&args.params)? {
        Some(matrix) => println!("{}", to_json(&matrix, args.pretty)?),
        None => info!("No algorithm parameter among {:?}, nothing to generate", args.params),
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        error!("{}", e);
        eprintln!("Error: {}", e);
        exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_categories_and_policy() {
        let args = Args::try_parse_from([
            "ssh-algo-matrix",
            "--category", "kex",
            "--category", "enum_dut_ssh_mac",
            "--on-query-failure", "fail",
        ]).unwrap();

        assert_eq!(
            args.categories,
            vec![AlgorithmCategory::KeyExchange, AlgorithmCategory::MessageAuthenticationCode]
        );
        assert_eq!(args.on_query_failure, Some(FailurePolicy::Fail));
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        assert!(Args::try_parse_from(["ssh-algo-matrix", "--category", "hostkey"]).is_err());
        assert!(Args::try_parse_from(["ssh-algo-matrix", "--on-query-failure", "retry"]).is_err());
        assert!(Args::try_parse_from(["ssh-algo-matrix", "--strict", "--on-query-failure", "degrade"]).is_err());
        assert!(Args::try_parse_from(["ssh-algo-matrix", "--all", "--category", "mac"]).is_err());
    }
}
