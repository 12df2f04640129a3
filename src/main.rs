//! acmesh-prep - Main entry point
//!
//! One-shot rewrite of the acme.sh bundle; run from the directory that
//! holds `acme.sh` and `dnsapi/`.

use acmesh_prep::cli::Cli;
use acmesh_prep::{ABORT_EXIT_CODE, Preprocessor, abort_message};
use anyhow::Context;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// Initialize the logger with appropriate settings
fn init_logger(default_level: &str) {
    // RUST_LOG overrides the verbosity flags
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Main application entry point
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    init_logger(cli.log_level());

    let preprocessor = Preprocessor::new(cli.to_config());
    debug!("Resolved paths: {:?}", preprocessor.config());

    let result = if cli.dry_run {
        info!("Dry run: no files will be removed or written");
        preprocessor.plan()
    } else {
        preprocessor.run()
    };

    let report = match result {
        Ok(report) => report,
        Err(err) if err.is_preflight() => {
            error!("Pre-flight check failed: {}", err);
            println!("{}", abort_message(&err));
            std::process::exit(ABORT_EXIT_CODE);
        }
        Err(err) => return Err(err).context("acme.sh preprocessing failed"),
    };

    if cli.json {
        println!("{}", report.to_json().context("failed to encode report")?);
    } else if report.dry_run {
        for path in &report.removed {
            println!("would remove {}", path.display());
        }
        println!("would write {}", report.library_file.display());
        for path in &report.written {
            println!("would write {}", path.display());
        }
    }

    Ok(())
}
