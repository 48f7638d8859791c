//! Detection of the guarded command family

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// Structural marker: a container run
pub static DOCKER_RUN: Lazy<Regex> = Lazy::new(|| case_insensitive(r"docker\s+run"));

/// Tool name marker
pub static SEMGREP: Lazy<Regex> = Lazy::new(|| case_insensitive(r"semgrep"));

fn case_insensitive(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .unwrap_or_else(|e| panic!("invalid built-in pattern {}: {}", pattern, e))
}

/// Both markers present, in any order
pub fn is_semgrep_command(command: &str) -> bool {
    DOCKER_RUN.is_match(command) && SEMGREP.is_match(command)
}
