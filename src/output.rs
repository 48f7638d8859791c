//! Hook decisions and how they reach the host
//!
//! Claude Code reads a hook's exit status and streams:
//! - exit 0, stdout text: the text is added as context (activation report)
//! - exit 2, stderr text: the action is denied and the text shown
//! - exit 0, nothing printed: neutral

use std::io::{self, Write};

/// Neutral or allow
pub const EXIT_NEUTRAL: i32 = 0;

/// Hard block: deny, surface the message, do not retry automatically
pub const EXIT_BLOCK: i32 = 2;

/// Decision produced by an engine
#[derive(Debug, Clone)]
pub enum Decision {
    /// Proceed silently
    Allow { reason: String },

    /// Proceed with an advisory report
    Advise { matched: Vec<String>, report: String },

    /// Block the action
    Block {
        rule_id: String,
        reason: String,
        message: String,
    },

    /// Would block, but dry-run mode lets it through with the message
    Warn {
        rule_id: String,
        reason: String,
        message: String,
    },
}

impl Decision {
    /// Create an allow decision
    pub fn allow(reason: impl Into<String>) -> Self {
        Decision::Allow {
            reason: reason.into(),
        }
    }

    /// Create an advisory decision
    pub fn advise(matched: Vec<String>, report: impl Into<String>) -> Self {
        Decision::Advise {
            matched,
            report: report.into(),
        }
    }

    /// Create a block decision
    pub fn block(
        rule_id: impl Into<String>,
        reason: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Decision::Block {
            rule_id: rule_id.into(),
            reason: reason.into(),
            message: message.into(),
        }
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow { .. })
    }

    pub fn is_advise(&self) -> bool {
        matches!(self, Decision::Advise { .. })
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Decision::Block { .. })
    }

    /// Turn a block into a warning (dry-run)
    pub fn into_warning(self) -> Self {
        match self {
            Decision::Block {
                rule_id,
                reason,
                message,
            } => Decision::Warn {
                rule_id,
                reason,
                message,
            },
            other => other,
        }
    }

    /// Get the rule ID if applicable
    pub fn rule_id(&self) -> Option<&str> {
        match self {
            Decision::Block { rule_id, .. } | Decision::Warn { rule_id, .. } => Some(rule_id),
            _ => None,
        }
    }

    /// Get the reason
    pub fn reason(&self) -> &str {
        match self {
            Decision::Allow { reason } => reason,
            Decision::Advise { .. } => "advisory report emitted",
            Decision::Block { reason, .. } | Decision::Warn { reason, .. } => reason,
        }
    }

    /// Advisory report text, if any
    pub fn report(&self) -> Option<&str> {
        match self {
            Decision::Advise { report, .. } => Some(report),
            _ => None,
        }
    }

    /// Rule names that matched, for advisory decisions
    pub fn matched(&self) -> &[String] {
        match self {
            Decision::Advise { matched, .. } => matched,
            _ => &[],
        }
    }
}

/// What the process writes and its exit status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookOutput {
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub exit_code: i32,
}

impl HookOutput {
    /// Neutral exit, no output
    pub fn neutral() -> Self {
        HookOutput {
            stdout: None,
            stderr: None,
            exit_code: EXIT_NEUTRAL,
        }
    }

    /// Text for the host on stdout, neutral exit
    pub fn context(text: impl Into<String>) -> Self {
        HookOutput {
            stdout: Some(text.into()),
            stderr: None,
            exit_code: EXIT_NEUTRAL,
        }
    }

    /// Blocking message on stderr, blocking exit
    pub fn block(message: impl Into<String>) -> Self {
        HookOutput {
            stdout: None,
            stderr: Some(message.into()),
            exit_code: EXIT_BLOCK,
        }
    }

    /// Message on stderr, neutral exit
    pub fn warn(message: impl Into<String>) -> Self {
        HookOutput {
            stdout: None,
            stderr: Some(message.into()),
            exit_code: EXIT_NEUTRAL,
        }
    }

    /// Create output from a Decision
    pub fn from_decision(decision: &Decision) -> Self {
        match decision {
            Decision::Allow { .. } => HookOutput::neutral(),
            Decision::Advise { report, .. } => HookOutput::context(report.as_str()),
            Decision::Block { message, .. } => HookOutput::block(message.as_str()),
            Decision::Warn { message, .. } => HookOutput::warn(message.as_str()),
        }
    }

    pub fn is_silent(&self) -> bool {
        self.stdout.is_none() && self.stderr.is_none()
    }

    /// Write the streams and return the exit status
    pub fn emit(&self) -> i32 {
        if let Some(ref text) = self.stdout {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            let _ = writeln!(handle, "{}", text);
            let _ = handle.flush();
        }
        if let Some(ref text) = self.stderr {
            let stderr = io::stderr();
            let mut handle = stderr.lock();
            let _ = writeln!(handle, "{}", text);
            let _ = handle.flush();
        }
        self.exit_code
    }
}
