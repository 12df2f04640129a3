//! The preprocessing pipeline.
//!
//! validate → clean → write library → create output dir → rewrite plugins.
//!
//! # Invariants
//!
//! - Nothing is removed or written unless pre-flight passes, and pre-flight
//!   rejects outputs that would remove or overwrite an input.
//! - The library is written before any plugin, since plugins source it.
//! - After a successful run the output directory holds exactly one file per
//!   qualifying plugin; prior runs leave nothing behind.
//!
//! # Failure Modes
//!
//! - Missing input: `PrepError::MissingMainScript` / `MissingPluginDir`
//! - Output aliasing an input: `PrepError::OverlappingPaths`
//! - Any later filesystem failure: `PrepError::Io`, no rollback

use crate::config::PrepConfig;
use crate::error::{IoContext, Result};
use crate::preflight::verify_inputs;
use crate::report::{PrepReport, SkipReason, SkippedEntry};
use crate::transform::{compose_plugin, has_trailer, is_plugin_script, strip_trailer};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Plugin directory entry after classification
enum PluginEntry {
    Script { name: OsString, path: PathBuf },
    Skipped(SkippedEntry),
}

/// Runs the acme.sh bundle transformation for one set of paths
#[derive(Debug, Clone)]
pub struct Preprocessor {
    config: PrepConfig,
}

impl Preprocessor {
    pub fn new(config: PrepConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PrepConfig {
        &self.config
    }

    /// Perform the full rebuild
    pub fn run(&self) -> Result<PrepReport> {
        verify_inputs(&self.config).into_result()?;

        let mut report = PrepReport {
            library_file: self.config.library_file.clone(),
            ..Default::default()
        };

        report.removed = self.clean()?;

        let main_script = read_text(&self.config.main_script)?;
        report.trailer_stripped = has_trailer(&main_script);
        if !report.trailer_stripped {
            debug!(
                "no invocation trailer in {}, writing unchanged",
                self.config.main_script.display()
            );
        }
        let library = strip_trailer(&main_script);
        fs::write(&self.config.library_file, library)
            .with_path("write", &self.config.library_file)?;
        info!("Wrote library {}", self.config.library_file.display());

        fs::create_dir_all(&self.config.output_dir)
            .with_path("create directory", &self.config.output_dir)?;

        let directive = self.config.source_directive();
        for entry in self.plugin_entries()? {
            match entry {
                PluginEntry::Script { name, path } => {
                    let content = read_text(&path)?;
                    let target = self.config.output_dir.join(&name);
                    fs::write(&target, compose_plugin(&content, &directive))
                        .with_path("write", &target)?;
                    debug!("Rewrote {} -> {}", path.display(), target.display());
                    report.written.push(target);
                }
                PluginEntry::Skipped(skipped) => report.skipped.push(skipped),
            }
        }

        info!(
            "Rewrote {} plugin script(s) into {}",
            report.plugin_count(),
            self.config.output_dir.display()
        );
        Ok(report)
    }

    /// Report what `run` would do without touching the filesystem
    pub fn plan(&self) -> Result<PrepReport> {
        verify_inputs(&self.config).into_result()?;

        let main_script = read_text(&self.config.main_script)?;
        let mut report = PrepReport {
            library_file: self.config.library_file.clone(),
            trailer_stripped: has_trailer(&main_script),
            removed: self.stale_artifacts(),
            dry_run: true,
            ..Default::default()
        };

        for entry in self.plugin_entries()? {
            match entry {
                PluginEntry::Script { name, .. } => {
                    report.written.push(self.config.output_dir.join(name))
                }
                PluginEntry::Skipped(skipped) => report.skipped.push(skipped),
            }
        }

        info!("[DRY RUN] {} plugin script(s) would be rewritten", report.plugin_count());
        Ok(report)
    }

    /// Outputs of a prior run that the clean step would delete
    fn stale_artifacts(&self) -> Vec<PathBuf> {
        [&self.config.output_dir, &self.config.library_file]
            .into_iter()
            .filter(|p| p.exists())
            .cloned()
            .collect()
    }

    fn clean(&self) -> Result<Vec<PathBuf>> {
        let mut removed = Vec::new();

        if self.config.output_dir.exists() {
            fs::remove_dir_all(&self.config.output_dir)
                .with_path("remove directory", &self.config.output_dir)?;
            info!("Removed previous output {}", self.config.output_dir.display());
            removed.push(self.config.output_dir.clone());
        }
        if self.config.library_file.exists() {
            fs::remove_file(&self.config.library_file)
                .with_path("remove", &self.config.library_file)?;
            info!("Removed previous library {}", self.config.library_file.display());
            removed.push(self.config.library_file.clone());
        }

        Ok(removed)
    }

    /// Plugin directory entries, sorted by file name
    fn plugin_entries(&self) -> Result<Vec<PluginEntry>> {
        let dir = &self.config.plugin_dir;
        let mut names = fs::read_dir(dir)
            .with_path("read directory", dir)?
            .map(|entry| entry.map(|e| e.file_name()))
            .collect::<std::io::Result<Vec<_>>>()
            .with_path("read directory", dir)?;
        names.sort();

        let mut entries = Vec::with_capacity(names.len());
        for name in names {
            let path = dir.join(&name);
            if !is_plugin_script(&name) {
                debug!("Skipping non-script entry {}", path.display());
                entries.push(PluginEntry::Skipped(SkippedEntry {
                    name: name.to_string_lossy().into_owned(),
                    reason: SkipReason::NotScript,
                }));
                continue;
            }

            let meta = fs::metadata(&path).with_path("stat", &path)?;
            if !meta.is_file() {
                warn!("Skipping {}: not a regular file", path.display());
                entries.push(PluginEntry::Skipped(SkippedEntry {
                    name: name.to_string_lossy().into_owned(),
                    reason: SkipReason::NotRegularFile,
                }));
                continue;
            }

            entries.push(PluginEntry::Script { name, path });
        }
        Ok(entries)
    }
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_path("read", path)
}
