//! Activation rules for claude-skill-gate
//!
//! A rule is a named skill trigger: keyword phrases, intent patterns,
//! exclusion patterns and command-prefix skips, tagged with a priority.

pub mod loader;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub use loader::{RuleDefinition, RuleFile};

/// Priority tier of a rule, declared from most to least severe
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Skill is required before responding
    Critical,

    /// Skill is recommended
    High,

    /// Skill is suggested
    #[default]
    Medium,

    /// Skill is optional
    Low,
}

impl Priority {
    /// All tiers in report order (most severe first)
    pub const ALL: [Priority; 4] = [
        Priority::Critical,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];

    /// Parse from string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "critical" => Some(Priority::Critical),
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }

    /// Check if this tier is at least as severe as `threshold`
    pub fn includes(&self, threshold: Priority) -> bool {
        *self <= threshold
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A keyword phrase: every token must be present in the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordPhrase {
    tokens: Vec<String>,
}

impl KeywordPhrase {
    /// Split a phrase on whitespace into lower-cased tokens.
    /// Returns None for a phrase with no tokens.
    pub fn new(phrase: &str) -> Option<Self> {
        let tokens: Vec<String> = phrase.split_whitespace().map(str::to_lowercase).collect();
        if tokens.is_empty() {
            None
        } else {
            Some(Self { tokens })
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Order-independent containment against an already case-folded input
    pub fn is_satisfied_by(&self, folded_input: &str) -> bool {
        self.tokens.iter().all(|token| folded_input.contains(token.as_str()))
    }
}

/// A compiled activation rule
#[derive(Debug, Clone)]
pub struct Rule {
    /// Unique rule (skill) name
    pub name: String,

    /// Priority tier, `medium` when absent
    pub priority: Priority,

    /// Keyword phrases (OR across phrases, AND across tokens)
    pub keywords: Vec<KeywordPhrase>,

    /// Case-insensitive intent patterns, searched in the raw input
    pub intent_patterns: Vec<Regex>,

    /// Case-insensitive patterns that exempt the rule entirely
    pub exclude_patterns: Vec<Regex>,

    /// Lower-cased literal prefixes that exempt the rule
    pub skip_prefixes: Vec<String>,
}

impl Rule {
    /// Create a rule with no criteria
    pub fn new(name: impl Into<String>, priority: Priority) -> Self {
        Self {
            name: name.into(),
            priority,
            keywords: Vec::new(),
            intent_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
            skip_prefixes: Vec::new(),
        }
    }

    /// A rule with neither keywords nor intent patterns can never match
    pub fn has_criteria(&self) -> bool {
        !self.keywords.is_empty() || !self.intent_patterns.is_empty()
    }
}

/// The immutable set of rules loaded at process start
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    warnings: Vec<String>,
}

impl RuleSet {
    /// Create an empty rule set
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a rule set from already compiled rules
    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Self {
            rules,
            warnings: Vec::new(),
        }
    }

    /// Load a rule file, degrading to an empty set on any failure
    pub fn load(path: &Path) -> Self {
        loader::load_or_empty(path)
    }

    /// Parse a rule document from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let file: RuleFile = serde_json::from_str(json)?;
        Ok(loader::compile(&file))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in document order
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Look up a rule by name
    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name == name)
    }

    /// Problems found while loading (bad patterns, malformed rules)
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub(crate) fn push_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}
