//! Input and output locations for a preprocessing run.
//!
//! The defaults are the literal names the DNS-01 acme.sh provider expects,
//! relative to the current directory. Tests and `--dir` root them elsewhere.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Main acme.sh script
pub const MAIN_SCRIPT: &str = "acme.sh";
/// Directory holding the stock dnsapi plugin scripts
pub const PLUGIN_DIR: &str = "dnsapi";
/// Sourceable library written from the main script
pub const LIBRARY_FILE: &str = "acme_src.sh";
/// Output directory for rewritten plugins; kept in sync with the provider's
/// script lookup path
pub const OUTPUT_DIR: &str = "./dnsapi_cw";
const OUTPUT_DIR_NAME: &str = "dnsapi_cw";
/// Line at the end of acme.sh that runs the entry point
pub const MAIN_TRAILER: &str = r#"main "$@""#;
/// Only plugin entries with this suffix are rewritten
pub const SCRIPT_EXTENSION: &str = ".sh";

/// Paths used by a single run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrepConfig {
    pub main_script: PathBuf,
    pub plugin_dir: PathBuf,
    pub library_file: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            main_script: PathBuf::from(MAIN_SCRIPT),
            plugin_dir: PathBuf::from(PLUGIN_DIR),
            library_file: PathBuf::from(LIBRARY_FILE),
            output_dir: PathBuf::from(OUTPUT_DIR),
        }
    }
}

impl PrepConfig {
    /// Default layout joined onto `root`
    pub fn rooted_at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            main_script: root.join(MAIN_SCRIPT),
            plugin_dir: root.join(PLUGIN_DIR),
            library_file: root.join(LIBRARY_FILE),
            output_dir: root.join(OUTPUT_DIR_NAME),
        }
    }

    /// Line injected after each plugin's shebang.
    ///
    /// Plugins run from inside the output directory, so the library is
    /// referenced one level up by file name.
    pub fn source_directive(&self) -> String {
        let name = self
            .library_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| LIBRARY_FILE.to_string());
        format!(". ../{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let config = PrepConfig::default();
        assert_eq!(config.main_script, PathBuf::from("acme.sh"));
        assert_eq!(config.plugin_dir, PathBuf::from("dnsapi"));
        assert_eq!(config.library_file, PathBuf::from("acme_src.sh"));
        assert_eq!(config.output_dir, PathBuf::from("./dnsapi_cw"));
    }

    #[test]
    fn test_rooted_at() {
        let config = PrepConfig::rooted_at("/tmp/bundle");
        assert_eq!(config.main_script, PathBuf::from("/tmp/bundle/acme.sh"));
        assert_eq!(config.library_file, PathBuf::from("/tmp/bundle/acme_src.sh"));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/bundle/dnsapi_cw"));
    }

    #[test]
    fn test_source_directive() {
        assert_eq!(PrepConfig::default().source_directive(), ". ../acme_src.sh");

        let config = PrepConfig {
            library_file: PathBuf::from("/opt/lib/acme_lib.sh"),
            ..Default::default()
        };
        assert_eq!(config.source_directive(), ". ../acme_lib.sh");
    }

    #[test]
    fn test_source_directive_without_file_name() {
        let config = PrepConfig {
            library_file: PathBuf::from("/"),
            ..Default::default()
        };
        assert_eq!(config.source_directive(), ". ../acme_src.sh");
    }
}
