//! Pre-flight checks for the input layout
//!
//! Runs before anything on disk is touched. If either required input is
//! missing, or an output path would land on an input, the run aborts with a
//! message naming it and no file is removed or written.

use crate::config::{MAIN_SCRIPT, PLUGIN_DIR, PrepConfig};
use crate::error::{PrepError, Result};
use std::path::{Path, PathBuf};

/// Exit status used for a failed pre-flight check
pub const ABORT_EXIT_CODE: i32 = -1;

/// Result of input verification
#[derive(Debug, Default)]
pub struct PreflightResult {
    pub missing_main_script: Option<PathBuf>,
    pub missing_plugin_dir: Option<PathBuf>,
    /// First output/input pair that alias, as given in the config
    pub overlap: Option<(PathBuf, PathBuf)>,
}

impl PreflightResult {
    /// Returns true if all checks passed
    pub fn is_ok(&self) -> bool {
        self.missing_main_script.is_none()
            && self.missing_plugin_dir.is_none()
            && self.overlap.is_none()
    }

    /// First failed check as an error; the main script is checked first
    pub fn into_result(self) -> Result<()> {
        if let Some(path) = self.missing_main_script {
            return Err(PrepError::MissingMainScript(path));
        }
        if let Some(path) = self.missing_plugin_dir {
            return Err(PrepError::MissingPluginDir(path));
        }
        if let Some((output, input)) = self.overlap {
            return Err(PrepError::OverlappingPaths { output, input });
        }
        Ok(())
    }
}

/// Check both required inputs and report every one that is missing.
///
/// Once both exist, the outputs are checked against them: the clean step
/// deletes the library file and the whole output directory.
pub fn verify_inputs(config: &PrepConfig) -> PreflightResult {
    let mut result = PreflightResult::default();

    if !config.main_script.exists() {
        tracing::debug!("main script missing: {}", config.main_script.display());
        result.missing_main_script = Some(config.main_script.clone());
    }

    // A plain file at the plugin path cannot be listed later, so it fails here
    if !config.plugin_dir.is_dir() {
        tracing::debug!("plugin directory missing: {}", config.plugin_dir.display());
        result.missing_plugin_dir = Some(config.plugin_dir.clone());
    }

    if result.is_ok() {
        result.overlap = find_overlap(config);
        if let Some((output, input)) = &result.overlap {
            tracing::debug!("output {} overlaps input {}", output.display(), input.display());
        }
    }

    result
}

/// Library must not be either input; output dir must not be or contain one
fn find_overlap(config: &PrepConfig) -> Option<(PathBuf, PathBuf)> {
    let main_script = resolve(&config.main_script);
    let plugin_dir = resolve(&config.plugin_dir);
    let library_file = resolve(&config.library_file);
    let output_dir = resolve(&config.output_dir);

    if library_file == main_script {
        return Some((config.library_file.clone(), config.main_script.clone()));
    }
    if library_file == plugin_dir {
        return Some((config.library_file.clone(), config.plugin_dir.clone()));
    }
    if main_script.starts_with(&output_dir) {
        return Some((config.output_dir.clone(), config.main_script.clone()));
    }
    if plugin_dir.starts_with(&output_dir) {
        return Some((config.output_dir.clone(), config.plugin_dir.clone()));
    }
    None
}

/// Canonical form of `path`, following symlinks as far as the path exists.
///
/// Missing trailing components are appended to the canonical parent.
fn resolve(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if parent.as_os_str().is_empty() => {
            resolve(Path::new(".")).join(name)
        }
        (Some(parent), Some(name)) => resolve(parent).join(name),
        _ => std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()),
    }
}

/// Abort line printed on stdout for a pre-flight error.
///
/// Default paths keep the historic wording; overridden paths are named.
pub fn abort_message(err: &PrepError) -> String {
    match err {
        PrepError::MissingMainScript(path) if is_literal(path, MAIN_SCRIPT) => {
            "abort: acme.sh not found in current working directory".to_string()
        }
        PrepError::MissingMainScript(path) => format!("abort: {} not found", path.display()),
        PrepError::MissingPluginDir(path) if is_literal(path, PLUGIN_DIR) => {
            "abort: acme.sh dnsapi path not found in current working directory".to_string()
        }
        PrepError::MissingPluginDir(path) => {
            format!("abort: acme.sh dnsapi path {} not found", path.display())
        }
        other => format!("abort: {}", other),
    }
}

fn is_literal(path: &Path, name: &str) -> bool {
    path == Path::new(name)
}
