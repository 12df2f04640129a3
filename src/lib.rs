//! acmesh-prep Library
//!
//! Converts the stock acme.sh bundle into the layout the DNS-01 acme.sh
//! provider sources at runtime: `acme_src.sh` (acme.sh without its
//! `main "$@"` trailer) and `dnsapi_cw/` (each plugin sourcing it).

pub mod cli;
pub mod config;
pub mod error;
pub mod preflight;
pub mod prep;
pub mod report;
pub mod transform;

// Re-export main types for convenience
pub use config::PrepConfig;
pub use error::{PrepError, Result};
pub use preflight::{ABORT_EXIT_CODE, PreflightResult, abort_message, verify_inputs};
pub use prep::Preprocessor;
pub use report::{PrepReport, SkipReason, SkippedEntry};
