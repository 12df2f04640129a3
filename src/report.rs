//! Summary of what a run removed, wrote and skipped.

use serde::Serialize;
use std::path::PathBuf;
use strum::Display;

/// Why a plugin directory entry produced no output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SkipReason {
    /// Name does not end in `.sh`
    NotScript,
    /// Ends in `.sh` but is a directory or other non-file entry
    NotRegularFile,
}

/// A plugin directory entry that was left alone
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub name: String,
    pub reason: SkipReason,
}

/// Outcome of a run (or the plan for a dry run)
#[derive(Debug, Clone, Default, Serialize)]
pub struct PrepReport {
    pub library_file: PathBuf,
    /// False when the main script had no `main "$@"` trailer
    pub trailer_stripped: bool,
    /// Prior artifacts deleted by the clean step
    pub removed: Vec<PathBuf>,
    /// Rewritten plugin files, in file name order
    pub written: Vec<PathBuf>,
    pub skipped: Vec<SkippedEntry>,
    pub dry_run: bool,
}

impl PrepReport {
    pub fn plugin_count(&self) -> usize {
        self.written.len()
    }

    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
