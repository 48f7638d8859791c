//! Per-rule skip evaluation and criterion matchers
//!
//! Two comparison modes are deliberately kept apart:
//! - keyword phrases use plain substring containment on the case-folded input
//! - intent and exclusion patterns run case-insensitively on the raw input

use crate::rules::Rule;

/// A prompt prepared once at ingestion
#[derive(Debug, Clone)]
pub struct Prompt {
    raw: String,
    folded: String,
}

impl Prompt {
    pub fn new(input: &str) -> Self {
        let raw = input.trim().to_string();
        let folded = raw.to_lowercase();
        Self { raw, folded }
    }

    /// Trimmed input as received
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Trimmed, lower-cased input
    pub fn folded(&self) -> &str {
        &self.folded
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// Signature shared by every criterion check
pub type Criterion = fn(&Rule, &Prompt) -> bool;

/// Criteria in evaluation order; the first one satisfied wins
pub const CRITERIA: &[(&str, Criterion)] = &[
    ("keywords", matches_keywords),
    ("intent", matches_intent),
];

/// Whether the rule is exempt for this prompt
pub fn should_skip(rule: &Rule, prompt: &Prompt) -> bool {
    let excluded = rule
        .exclude_patterns
        .iter()
        .any(|re| re.is_match(prompt.raw()));

    let skipped_command = rule
        .skip_prefixes
        .iter()
        .any(|prefix| prompt.folded().starts_with(prefix.as_str()));

    excluded || skipped_command
}

/// Any phrase whose tokens all appear in the folded input
pub fn matches_keywords(rule: &Rule, prompt: &Prompt) -> bool {
    rule.keywords
        .iter()
        .any(|phrase| phrase.is_satisfied_by(prompt.folded()))
}

/// Any intent pattern found anywhere in the raw input
pub fn matches_intent(rule: &Rule, prompt: &Prompt) -> bool {
    rule.intent_patterns
        .iter()
        .any(|re| re.is_match(prompt.raw()))
}

/// Name of the first criterion the rule satisfies
pub fn first_satisfied(rule: &Rule, prompt: &Prompt) -> Option<&'static str> {
    CRITERIA
        .iter()
        .find(|(_, check)| check(rule, prompt))
        .map(|(name, _)| *name)
}
