//! Error types for claude-skill-gate
//!
//! None of these cross the process boundary: every variant is collapsed
//! into either a neutral exit or a blocking exit by the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to read or parse the activation rule file
#[derive(Error, Debug)]
pub enum RuleLoadError {
    #[error("rule file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read rule file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse rule file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure of a delegated child process
#[derive(Error, Debug)]
pub enum ProcessError {
    /// The program could not be found on disk or on PATH
    #[error("program not found: {0}")]
    NotFound(String),

    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting for child process: {0}")]
    Wait(std::io::Error),

    #[error("timed out after {0}s")]
    Timeout(u64),

    #[error("failed to start process runtime: {0}")]
    Runtime(std::io::Error),
}

/// Outcome classes of the external command validator
#[derive(Error, Debug)]
pub enum ValidatorError {
    /// Validator program or script does not exist (treated as valid)
    #[error("validator not available: {0}")]
    Missing(String),

    #[error("validation timed out (>{0}s)")]
    Timeout(u64),

    /// Validator ran and rejected the command
    #[error("{stderr}")]
    Rejected { status: Option<i32>, stderr: String },

    #[error("validation failed to run: {0}")]
    Invocation(String),
}

impl ValidatorError {
    /// Whether this error should still let the command through
    pub fn is_fail_open(&self) -> bool {
        matches!(self, ValidatorError::Missing(_))
    }
}

impl From<ProcessError> for ValidatorError {
    fn from(err: ProcessError) -> Self {
        match err {
            ProcessError::NotFound(program) => ValidatorError::Missing(program),
            ProcessError::Timeout(secs) => ValidatorError::Timeout(secs),
            other => ValidatorError::Invocation(other.to_string()),
        }
    }
}
