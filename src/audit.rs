//! JSONL audit logging for claude-skill-gate
//!
//! Records one line per hook invocation for later analysis.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::input::{truncate, HookInput};
use crate::output::Decision;
use crate::redact::redact_secrets;

/// Hook mode that produced an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Activate,
    Guard,
    Postprocess,
}

impl Mode {
    /// Parse a mode name from the command line
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "activate" | "skill-activation" => Some(Mode::Activate),
            "guard" | "semgrep-guard" => Some(Mode::Guard),
            "postprocess" | "post-process" => Some(Mode::Postprocess),
            _ => None,
        }
    }
}

/// Log level for audit entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Allowed,
    Advised,
    Blocked,
    Warn,
    Disabled,
    Skipped,
    Error,
}

/// An audit log entry
#[derive(Debug, Serialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub mode: Mode,
    pub level: LogLevel,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,

    /// Redacted, truncated summary of the input
    pub input_summary: String,

    pub reason: String,

    /// Rules matched by an activation
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub matched: Vec<String>,

    /// Configuration problems seen during the invocation
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl AuditEntry {
    /// Create a new audit entry from input and decision
    pub fn new(mode: Mode, input: &HookInput, decision: &Decision, disabled: bool) -> Self {
        Self::build(mode, &input.summary(), input.session_id.clone(), decision, disabled)
    }

    /// Entry for raw text input that carries no hook envelope
    pub fn for_text(mode: Mode, text: &str, decision: &Decision, disabled: bool) -> Self {
        let summary = format!("Text: {}", truncate(text.trim(), 100));
        Self::build(mode, &summary, None, decision, disabled)
    }

    fn build(
        mode: Mode,
        summary: &str,
        session_id: Option<String>,
        decision: &Decision,
        disabled: bool,
    ) -> Self {
        let (level, reason) = if disabled {
            (LogLevel::Disabled, "SKILL_GATE_DISABLED".to_string())
        } else {
            let level = match decision {
                Decision::Allow { .. } => LogLevel::Allowed,
                Decision::Advise { .. } => LogLevel::Advised,
                Decision::Block { .. } => LogLevel::Blocked,
                Decision::Warn { .. } => LogLevel::Warn,
            };
            (level, decision.reason().to_string())
        };

        Self {
            timestamp: Utc::now(),
            mode,
            level,
            rule_id: decision.rule_id().map(String::from),
            input_summary: redact_secrets(summary),
            reason: truncate(&redact_secrets(&reason), 500),
            matched: decision.matched().to_vec(),
            warnings: Vec::new(),
            session_id,
        }
    }

    /// Entry for input that could not be used at all
    pub fn skipped(mode: Mode, reason: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            mode,
            level: LogLevel::Skipped,
            rule_id: None,
            input_summary: String::new(),
            reason: reason.into(),
            matched: Vec::new(),
            warnings: Vec::new(),
            session_id: None,
        }
    }

    /// Attach configuration warnings; a non-empty list raises ALLOWED to ERROR
    pub fn with_warnings(mut self, warnings: &[String]) -> Self {
        if !warnings.is_empty() && self.level == LogLevel::Allowed {
            self.level = LogLevel::Error;
        }
        self.warnings.extend(warnings.iter().cloned());
        self
    }
}

/// Audit logger
#[derive(Default)]
pub struct AuditLogger {
    writer: Option<BufWriter<File>>,
}

impl AuditLogger {
    /// Create a new audit logger; an unusable path disables logging
    pub fn new(path: Option<&Path>) -> Self {
        let writer = path.and_then(|p| {
            if let Some(parent) = p.parent() {
                let _ = std::fs::create_dir_all(parent);
            }

            OpenOptions::new()
                .create(true)
                .append(true)
                .open(p)
                .ok()
                .map(BufWriter::new)
        });

        Self { writer }
    }

    /// Log an audit entry
    pub fn log(&mut self, entry: &AuditEntry) -> Result<(), std::io::Error> {
        if let Some(ref mut writer) = self.writer {
            let json = serde_json::to_string(entry)?;
            writeln!(writer, "{}", json)?;
            writer.flush()?;
        }
        Ok(())
    }

    /// Log a decision
    pub fn log_decision(
        &mut self,
        mode: Mode,
        input: &HookInput,
        decision: &Decision,
        disabled: bool,
    ) -> Result<(), std::io::Error> {
        let entry = AuditEntry::new(mode, input, decision, disabled);
        self.log(&entry)
    }

    /// Check if logging is enabled
    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }
}
