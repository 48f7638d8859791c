//! Command validation gate
//!
//! Intercepts Bash commands that run Semgrep in a container and lets them
//! through only when the external validator approves.
//!
//! ```text
//! Idle ──detected──▶ Detected ──escape hatch──▶ Allowed
//!                        │
//!                        └──locate config──▶ Validating ──▶ Valid | Invalid
//! ```

pub mod detect;
pub mod message;
pub mod validator;
pub mod workspace;

use std::path::PathBuf;

use crate::config::{GateConfig, HookEnv};
use crate::input::HookInput;
use crate::output::Decision;

use message::BlockMessage;
pub use validator::{ScriptValidator, ValidationOutcome, Validator};

/// Rule ID reported for blocked commands
pub const RULE_ID: &str = "semgrep-validation";

/// Terminal state of one gate evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    /// Not a guarded command
    Idle,

    /// Escape hatch set; validator not consulted
    Allowed,

    /// Validator approved (or is unavailable)
    Valid,

    /// Validator rejected, timed out or failed to run
    Invalid {
        detail: String,
        config_path: Option<PathBuf>,
    },
}

/// The validation gate
pub struct CommandGate<V = ScriptValidator> {
    config: GateConfig,
    env: HookEnv,
    validator: V,
}

impl CommandGate<ScriptValidator> {
    /// Create a gate backed by the configured validator program
    pub fn new(config: GateConfig, env: HookEnv) -> Self {
        let validator = ScriptValidator::new(&config.validator, &env);
        Self {
            config,
            env,
            validator,
        }
    }
}

impl<V: Validator> CommandGate<V> {
    /// Create a gate with a custom validator
    pub fn with_validator(config: GateConfig, env: HookEnv, validator: V) -> Self {
        Self {
            config,
            env,
            validator,
        }
    }

    /// Run the state machine for one command
    pub fn evaluate(&self, command: &str) -> GateState {
        if !detect::is_semgrep_command(command) {
            return GateState::Idle;
        }

        if self.env.skip_validation {
            return GateState::Allowed;
        }

        let config_path = workspace::find_config_file(
            &self.env,
            &self.config.workspace_dirs,
            &self.config.config_file_name,
        );

        let outcome = self.validator.validate(command, config_path.as_deref());
        if outcome.passed {
            GateState::Valid
        } else {
            GateState::Invalid {
                detail: outcome.detail,
                config_path,
            }
        }
    }

    /// Main entry point for a hook input
    pub fn check(&self, input: &HookInput) -> Decision {
        match input.bash_command() {
            Some(command) if !command.trim().is_empty() => self.check_command(command),
            Some(_) => Decision::allow("empty command"),
            None => Decision::allow("not a Bash tool call"),
        }
    }

    /// Decide on a single command
    pub fn check_command(&self, command: &str) -> Decision {
        match self.evaluate(command) {
            GateState::Idle => Decision::allow("not a semgrep docker command"),
            GateState::Allowed => {
                Decision::allow(format!("validation skipped via {}", self.config.skip_env_var))
            }
            GateState::Valid => Decision::allow("semgrep command validated"),
            GateState::Invalid {
                detail,
                config_path,
            } => {
                let recheck = self.validator.describe(command, config_path.as_deref());
                let message = BlockMessage {
                    detail: &detail,
                    skip_env_var: &self.config.skip_env_var,
                    docs_path: &self.config.docs_path,
                    recheck: recheck.as_deref(),
                }
                .render();
                Decision::block(RULE_ID, detail.trim(), message)
            }
        }
    }
}
