//! One hook invocation from raw stdin to process output
//!
//! Every failure is converted here into a neutral exit or a blocking exit;
//! nothing escapes as a panic or raw error.

use std::path::PathBuf;

use crate::audit::{AuditEntry, AuditLogger, Mode};
use crate::config::{Config, HookEnv};
use crate::engine::{ActivationEngine, ReportOptions};
use crate::gate::CommandGate;
use crate::input::HookInput;
use crate::output::{Decision, HookOutput};
use crate::postprocess::RuleOutputProcessor;
use crate::rules::RuleSet;

/// Per-invocation options from the command line
#[derive(Debug, Clone)]
pub struct Invocation {
    pub mode: Mode,

    /// Report blocks but never exit with the blocking status
    pub dry_run: bool,

    /// Postprocess: stdin is raw agent text, not hook JSON
    pub raw_text: bool,

    /// Activation rule file from `--rules`
    pub rules_path: Option<PathBuf>,
}

impl Invocation {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            dry_run: false,
            raw_text: false,
            rules_path: None,
        }
    }
}

/// Run one invocation
pub fn run(
    invocation: &Invocation,
    stdin: &str,
    config: &Config,
    env: &HookEnv,
    logger: &mut AuditLogger,
) -> HookOutput {
    let mode = invocation.mode;

    if mode == Mode::Postprocess && invocation.raw_text {
        return run_raw_text(stdin, config, env, logger);
    }

    // No input = nothing to check
    if stdin.trim().is_empty() {
        audit(logger, &AuditEntry::skipped(mode, "empty input"));
        return HookOutput::neutral();
    }

    let input = match HookInput::from_json(stdin) {
        Ok(input) => input,
        Err(e) => {
            audit(logger, &AuditEntry::skipped(mode, format!("malformed input: {}", e)));
            return HookOutput::neutral();
        }
    };

    if env.disabled {
        let decision = Decision::allow("disabled");
        audit(logger, &AuditEntry::new(mode, &input, &decision, true));
        return HookOutput::neutral();
    }

    let mut warnings: Vec<String> = Vec::new();

    let decision = match mode {
        Mode::Activate => {
            let rules = RuleSet::load(&config.rules_path(env, invocation.rules_path.as_deref()));
            warnings.extend(rules.warnings().iter().cloned());
            let options = ReportOptions {
                min_priority: config.activation.min_priority,
                action_line: config.activation.action_line.clone(),
            };
            ActivationEngine::new(rules, options).activate(input.prompt_text())
        }
        Mode::Guard => {
            let gate = CommandGate::new(config.gate.clone(), env.clone());
            gate.check(&input)
        }
        Mode::Postprocess => {
            let text = input.response_text().unwrap_or_default();
            RuleOutputProcessor::new(config.postprocess.clone(), env.clone()).check(&text)
        }
    };

    let decision = if invocation.dry_run {
        decision.into_warning()
    } else {
        decision
    };

    audit(
        logger,
        &AuditEntry::new(mode, &input, &decision, false).with_warnings(&warnings),
    );

    HookOutput::from_decision(&decision)
}

/// Postprocess over raw agent text: always reports unless disabled
fn run_raw_text(
    text: &str,
    config: &Config,
    env: &HookEnv,
    logger: &mut AuditLogger,
) -> HookOutput {
    if env.disabled {
        let decision = Decision::allow("disabled");
        audit(logger, &AuditEntry::for_text(Mode::Postprocess, text, &decision, true));
        return HookOutput::neutral();
    }

    let processor = RuleOutputProcessor::new(config.postprocess.clone(), env.clone());
    let decision = Decision::advise(Vec::new(), processor.process(text).render());
    audit(logger, &AuditEntry::for_text(Mode::Postprocess, text, &decision, false));
    HookOutput::from_decision(&decision)
}

fn audit(logger: &mut AuditLogger, entry: &AuditEntry) {
    if let Err(e) = logger.log(entry) {
        eprintln!("Warning: Failed to write audit log: {}", e);
    }
}
