//! Skill activation engine
//!
//! Scores a prompt against every rule, records at most one outcome per rule
//! and hands the matches to the reporter.

pub mod matches;
pub mod matchers;
pub mod report;

use crate::output::Decision;
use crate::rules::RuleSet;

pub use matchers::Prompt;
pub use matches::MatchResult;
pub use report::ReportOptions;

/// The activation matcher
pub struct ActivationEngine {
    rules: RuleSet,
    options: ReportOptions,
}

impl ActivationEngine {
    /// Create an engine over a loaded rule set
    pub fn new(rules: RuleSet, options: ReportOptions) -> Self {
        Self { rules, options }
    }

    /// Evaluate an input against every rule
    pub fn evaluate(&self, input: &str) -> MatchResult {
        evaluate(&self.rules, &Prompt::new(input))
    }

    /// Main entry point: evaluate a prompt and decide what to emit
    pub fn activate(&self, input: &str) -> Decision {
        let prompt = Prompt::new(input);
        if prompt.is_empty() {
            return Decision::allow("empty prompt");
        }
        if self.rules.is_empty() {
            return Decision::allow("no rules loaded");
        }

        let result = evaluate(&self.rules, &prompt);
        if result.is_empty() {
            return Decision::allow("no rules matched");
        }

        match report::render_with(&result, &self.options) {
            Some(text) => Decision::advise(result.names(), text),
            None => Decision::allow(format!(
                "matched rules below {} threshold",
                self.options.min_priority
            )),
        }
    }
}

/// Apply the skip evaluator and matchers to every rule, in rule order
pub fn evaluate(rules: &RuleSet, prompt: &Prompt) -> MatchResult {
    let mut result = MatchResult::default();

    for rule in rules.iter() {
        if matchers::should_skip(rule, prompt) {
            continue;
        }
        if result.contains(&rule.name) {
            continue;
        }
        if matchers::first_satisfied(rule, prompt).is_some() {
            result.record(&rule.name, rule.priority);
        }
    }

    result
}
