//! Delegation to the external command validator
//!
//! Contract: `<program> [script] --command <cmd> [args..] [--config-path <p>]`,
//! exit 0 means valid, anything else invalid with details on stderr.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use crate::config::{HookEnv, ValidatorConfig};
use crate::error::ValidatorError;
use crate::process;

/// Result of validating one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub passed: bool,
    pub detail: String,
}

impl ValidationOutcome {
    pub fn valid() -> Self {
        Self {
            passed: true,
            detail: String::new(),
        }
    }

    pub fn invalid(detail: impl Into<String>) -> Self {
        Self {
            passed: false,
            detail: detail.into(),
        }
    }
}

impl From<Result<(), ValidatorError>> for ValidationOutcome {
    fn from(result: Result<(), ValidatorError>) -> Self {
        match result {
            Ok(()) => ValidationOutcome::valid(),
            Err(e) if e.is_fail_open() => ValidationOutcome::valid(),
            Err(e) => ValidationOutcome::invalid(e.to_string()),
        }
    }
}

/// Something that can approve or reject a command
pub trait Validator {
    fn validate(&self, command: &str, config_path: Option<&Path>) -> ValidationOutcome;

    /// Shell-ready invocation for the operator to re-run by hand
    fn describe(&self, _command: &str, _config_path: Option<&Path>) -> Option<String> {
        None
    }
}

/// Validator backed by an external program
#[derive(Debug, Clone)]
pub struct ScriptValidator {
    program: String,
    script: Option<PathBuf>,
    args: Vec<String>,
    timeout: Duration,
}

impl ScriptValidator {
    pub fn new(config: &ValidatorConfig, env: &HookEnv) -> Self {
        Self {
            program: config.program.clone(),
            script: config.script.as_deref().map(|s| env.resolve(s)),
            args: config.args.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Argument vector after the program name
    fn arguments(&self, command: &str, config_path: Option<&Path>) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(ref script) = self.script {
            args.push(script.to_string_lossy().into_owned());
        }
        args.push("--command".to_string());
        args.push(command.to_string());
        args.extend(self.args.iter().cloned());
        if let Some(path) = config_path.filter(|p| p.exists()) {
            args.push("--config-path".to_string());
            args.push(path.to_string_lossy().into_owned());
        }
        args
    }

    /// Run the validator, classifying every failure
    pub fn run(&self, command: &str, config_path: Option<&Path>) -> Result<(), ValidatorError> {
        if let Some(ref script) = self.script {
            if !script.exists() {
                return Err(ValidatorError::Missing(script.display().to_string()));
            }
        }

        let mut cmd = Command::new(&self.program);
        cmd.args(self.arguments(command, config_path));

        let output = process::run_with_timeout(cmd, self.timeout)?;
        if output.success() {
            return Ok(());
        }

        let stderr = output.stderr.trim().to_string();
        let stderr = if stderr.is_empty() {
            match output.code() {
                Some(code) => format!("validator exited with status {}", code),
                None => "validator was terminated by a signal".to_string(),
            }
        } else {
            stderr
        };

        Err(ValidatorError::Rejected {
            status: output.code(),
            stderr,
        })
    }
}

impl Validator for ScriptValidator {
    fn validate(&self, command: &str, config_path: Option<&Path>) -> ValidationOutcome {
        self.run(command, config_path).into()
    }

    fn describe(&self, command: &str, config_path: Option<&Path>) -> Option<String> {
        let mut words = vec![self.program.clone()];
        words.extend(self.arguments(command, config_path));
        shlex::try_join(words.iter().map(String::as_str)).ok()
    }
}
