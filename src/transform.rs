//! Text rewriting rules for the acme.sh bundle.
//!
//! Script contents are opaque bytes of shell; nothing here parses them.
//! The library must match what the provider sources byte for byte, so the
//! trailer is removed by literal replacement only.

use crate::config::{MAIN_TRAILER, SCRIPT_EXTENSION};
use std::ffi::OsStr;

/// Remove every literal `main "$@"` from the main script.
///
/// The line terminator after the trailer is left in place. Content without
/// the trailer comes back unchanged.
pub fn strip_trailer(content: &str) -> String {
    content.replace(MAIN_TRAILER, "")
}

/// Whether `content` contains the invocation trailer at all
pub fn has_trailer(content: &str) -> bool {
    content.contains(MAIN_TRAILER)
}

/// Plugin entries are selected by raw name suffix, so non-UTF-8 names and a
/// bare `.sh` still qualify.
pub fn is_plugin_script(file_name: &OsStr) -> bool {
    file_name
        .as_encoded_bytes()
        .ends_with(SCRIPT_EXTENSION.as_bytes())
}

/// Split off the first line, keeping its `\n`.
///
/// Without a newline the whole content is the first line and the body is
/// empty.
pub fn split_first_line(content: &str) -> (&str, &str) {
    match content.find('\n') {
        Some(idx) => content.split_at(idx + 1),
        None => (content, ""),
    }
}

/// Shebang, then the source directive and a blank line, then the original body.
pub fn compose_plugin(content: &str, directive: &str) -> String {
    let (shebang, body) = split_first_line(content);
    let mut out = String::with_capacity(content.len() + directive.len() + 2);
    out.push_str(shebang);
    out.push_str(directive);
    out.push_str("\n\n");
    out.push_str(body);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIRECTIVE: &str = ". ../acme_src.sh";

    #[test]
    fn test_strip_trailer() {
        let input = "#!/usr/bin/env sh\nfoo() { :; }\nmain \"$@\"\n";
        assert_eq!(strip_trailer(input), "#!/usr/bin/env sh\nfoo() { :; }\n\n");
        assert!(has_trailer(input));
    }

    #[test]
    fn test_strip_trailer_absent_passes_through() {
        let input = "#!/usr/bin/env sh\nmain \"$1\"\nmain $@\n";
        assert_eq!(strip_trailer(input), input);
        assert!(!has_trailer(input));
    }

    #[test]
    fn test_strip_trailer_removes_every_occurrence() {
        let input = "a\nmain \"$@\"\nb\n  main \"$@\" # again\n";
        assert_eq!(strip_trailer(input), "a\n\nb\n   # again\n");
    }

    #[test]
    fn test_is_plugin_script() {
        assert!(is_plugin_script(OsStr::new("dns_cf.sh")));
        assert!(is_plugin_script(OsStr::new(".sh")));
        assert!(!is_plugin_script(OsStr::new("README.md")));
        assert!(!is_plugin_script(OsStr::new("dns_cf.sh.bak")));
        assert!(!is_plugin_script(OsStr::new("dns_cf.SH")));
    }

    #[cfg(unix)]
    #[test]
    fn test_is_plugin_script_non_utf8_name() {
        use std::os::unix::ffi::OsStrExt;
        assert!(is_plugin_script(OsStr::from_bytes(b"dns_\xff.sh")));
    }

    #[test]
    fn test_split_first_line() {
        assert_eq!(split_first_line("#!/bin/sh\nbody\n"), ("#!/bin/sh\n", "body\n"));
        assert_eq!(split_first_line("#!/bin/sh"), ("#!/bin/sh", ""));
        assert_eq!(split_first_line(""), ("", ""));
        assert_eq!(split_first_line("\nrest"), ("\n", "rest"));
    }

    #[test]
    fn test_compose_plugin() {
        let input = "#!/usr/bin/env sh\nExample_add() { :; }\n";
        assert_eq!(
            compose_plugin(input, DIRECTIVE),
            "#!/usr/bin/env sh\n. ../acme_src.sh\n\nExample_add() { :; }\n"
        );
    }

    #[test]
    fn test_compose_plugin_keeps_crlf_body_bytes() {
        let input = "#!/bin/sh\r\nfoo\r\n";
        assert_eq!(
            compose_plugin(input, DIRECTIVE),
            "#!/bin/sh\r\n. ../acme_src.sh\n\nfoo\r\n"
        );
    }

    #[test]
    fn test_compose_plugin_edge_inputs() {
        assert_eq!(compose_plugin("", DIRECTIVE), ". ../acme_src.sh\n\n");
        assert_eq!(
            compose_plugin("#!/bin/sh", DIRECTIVE),
            "#!/bin/sh. ../acme_src.sh\n\n"
        );
    }
}
