//! Error handling module for the preprocessor
//!
//! Provides centralized error types using thiserror. Preflight failures get
//! their own variants so the binary can map them to the abort message and
//! exit status; everything after preflight is an `Io` error.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for the preprocessor
#[derive(Error, Debug)]
pub enum PrepError {
    /// The main acme.sh script is absent
    #[error("{} not found", .0.display())]
    MissingMainScript(PathBuf),

    /// The dnsapi plugin directory is absent (or not a directory)
    #[error("plugin directory {} not found", .0.display())]
    MissingPluginDir(PathBuf),

    /// An output path would remove or overwrite an input
    #[error("output {} overlaps input {}", .output.display(), .input.display())]
    OverlappingPaths { output: PathBuf, input: PathBuf },

    /// Filesystem failure after preflight
    #[error("failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization of the run report
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for preprocessor operations
pub type Result<T> = std::result::Result<T, PrepError>;

impl PrepError {
    /// Create an IO error tagged with the operation and path that failed
    pub fn io(action: &'static str, path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// True for errors raised before anything on disk is touched
    pub fn is_preflight(&self) -> bool {
        matches!(
            self,
            Self::MissingMainScript(_) | Self::MissingPluginDir(_) | Self::OverlappingPaths { .. }
        )
    }
}

/// Extension for attaching operation/path context to `std::io::Result`
pub trait IoContext<T> {
    fn with_path(self, action: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn with_path(self, action: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|e| PrepError::io(action, path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PrepError::MissingMainScript(PathBuf::from("acme.sh"));
        assert_eq!(err.to_string(), "acme.sh not found");

        let err = PrepError::MissingPluginDir(PathBuf::from("dnsapi"));
        assert_eq!(err.to_string(), "plugin directory dnsapi not found");
    }

    #[test]
    fn test_io_context() {
        let res: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = res.with_path("write", "dnsapi_cw/dns_cf.sh").unwrap_err();
        assert!(matches!(err, PrepError::Io { action: "write", .. }));
        assert_eq!(err.to_string(), "failed to write dnsapi_cw/dns_cf.sh: denied");
        assert!(!err.is_preflight());
    }

    #[test]
    fn test_preflight_classification() {
        assert!(PrepError::MissingMainScript(PathBuf::from("acme.sh")).is_preflight());
        assert!(PrepError::MissingPluginDir(PathBuf::from("dnsapi")).is_preflight());

        let err = PrepError::OverlappingPaths {
            output: PathBuf::from("dnsapi"),
            input: PathBuf::from("dnsapi"),
        };
        assert!(err.is_preflight());
        assert_eq!(err.to_string(), "output dnsapi overlaps input dnsapi");
    }
}
