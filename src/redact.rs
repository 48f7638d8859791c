//! Secret redaction for audit records
//!
//! Prompts and commands are logged; credentials pasted into either must not be.

use once_cell::sync::Lazy;
use regex::Regex;

static SECRET_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // key=value style credentials
        r"(?i)(api|secret|access|auth)[_-]?(key|token)\s*[=:]\s*['\x22]?[a-zA-Z0-9_\-]{16,}",
        r"(?i)(password|passwd|pwd)\s*[=:]\s*['\x22]?[^\s'\x22]+",
        // provider tokens
        r"AKIA[0-9A-Z]{16}",
        r"gh[pousr]_[A-Za-z0-9_]{36,}",
        r"github_pat_[A-Za-z0-9_]{22,}",
        r"sk-[A-Za-z0-9_\-]{20,}",
        // semgrep app token passed to the container
        r"(?i)SEMGREP_APP_TOKEN\s*=\s*\S+",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

/// Redact secrets in text for logging
pub fn redact_secrets(text: &str) -> String {
    SECRET_PATTERNS
        .iter()
        .fold(text.to_string(), |acc, re| re.replace_all(&acc, "[REDACTED]").into_owned())
}
