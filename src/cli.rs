use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::config::PrepConfig;

/// acmesh-prep - Convert the stock acme.sh bundle for the DNS-01 acme.sh provider
///
/// Rewrites acme.sh into a sourceable acme_src.sh and every dnsapi/*.sh plugin
/// into dnsapi_cw/, sourcing the library after the shebang. Run it whenever
/// the bundled acme.sh version is bumped.
#[derive(Parser, Debug, Default)]
#[command(name = "acmesh-prep")]
#[command(version)]
pub struct Cli {
    /// Directory holding acme.sh and dnsapi/ (defaults to the current directory)
    #[arg(short = 'C', long = "dir", value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Main script path (overrides --dir)
    #[arg(long, value_name = "FILE")]
    pub main_script: Option<PathBuf>,

    /// Plugin directory path (overrides --dir)
    #[arg(long, value_name = "DIR")]
    pub plugin_dir: Option<PathBuf>,

    /// Library output path (overrides --dir)
    #[arg(long, value_name = "FILE")]
    pub library_file: Option<PathBuf>,

    /// Plugin output directory (overrides --dir)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Dry-run mode: check inputs and report what would be removed and
    /// written without touching the filesystem.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Resolve flags into the paths for this run
    pub fn to_config(&self) -> PrepConfig {
        let mut config = match &self.dir {
            Some(dir) => PrepConfig::rooted_at(dir),
            None => PrepConfig::default(),
        };

        if let Some(path) = &self.main_script {
            config.main_script = path.clone();
        }
        if let Some(path) = &self.plugin_dir {
            config.plugin_dir = path.clone();
        }
        if let Some(path) = &self.library_file {
            config.library_file = path.clone();
        }
        if let Some(path) = &self.output_dir {
            config.output_dir = path.clone();
        }

        config
    }

    /// Default filter directive when RUST_LOG is unset
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
