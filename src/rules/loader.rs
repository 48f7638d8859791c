//! Rule file loading
//!
//! Reads the `skill-rules.json` document:
//!
//! ```json
//! {
//!   "skills": {
//!     "semgrep-execution": {
//!       "priority": "high",
//!       "promptTriggers": {
//!         "keywords": ["semgrep scan"],
//!         "intentPatterns": ["run.*semgrep"],
//!         "excludePatterns": ["semgrep.*docs"]
//!       },
//!       "skipConditions": { "commands": ["/help"] }
//!     }
//!   }
//! }
//! ```
//!
//! Unknown keys are ignored. A rule with a malformed shape or a bad regex is
//! degraded individually; a missing or unreadable file yields no rules.

use regex::{Regex, RegexBuilder};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::path::Path;

use super::{KeywordPhrase, Priority, Rule, RuleSet};
use crate::error::RuleLoadError;

/// Top-level rule document
#[derive(Debug, Default, Deserialize)]
pub struct RuleFile {
    /// Rule definitions keyed by name, in document order
    #[serde(default, deserialize_with = "ordered_entries")]
    pub skills: Vec<(String, Value)>,
}

/// One rule as written in the document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuleDefinition {
    #[serde(deserialize_with = "lenient_priority")]
    pub priority: Priority,
    pub prompt_triggers: PromptTriggers,
    pub skip_conditions: SkipConditions,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PromptTriggers {
    pub keywords: Vec<String>,
    pub intent_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SkipConditions {
    pub commands: Vec<String>,
}

/// Read and compile a rule file
pub fn try_load(path: &Path) -> Result<RuleSet, RuleLoadError> {
    if !path.is_file() {
        return Err(RuleLoadError::NotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(RuleSet::empty());
    }
    let file: RuleFile = serde_json::from_str(&content)?;
    Ok(compile(&file))
}

/// Read and compile a rule file; any failure gives an empty set.
/// A parse failure is kept as a warning so it can be audited.
pub fn load_or_empty(path: &Path) -> RuleSet {
    match try_load(path) {
        Ok(rules) => rules,
        Err(RuleLoadError::NotFound(_)) => RuleSet::empty(),
        Err(e) => {
            let mut rules = RuleSet::empty();
            rules.push_warning(e.to_string());
            rules
        }
    }
}

/// Compile a parsed document into rules
pub fn compile(file: &RuleFile) -> RuleSet {
    let mut compiled = Vec::with_capacity(file.skills.len());
    let mut warnings = Vec::new();

    for (name, raw) in &file.skills {
        let definition: RuleDefinition = match serde_json::from_value(raw.clone()) {
            Ok(def) => def,
            Err(e) => {
                warnings.push(format!("rule '{}' ignored: {}", name, e));
                continue;
            }
        };
        compiled.push(compile_rule(name, &definition, &mut warnings));
    }

    let mut set = RuleSet::from_rules(compiled);
    for warning in warnings {
        set.push_warning(warning);
    }
    set
}

/// Compile one rule definition
pub fn compile_rule(name: &str, def: &RuleDefinition, warnings: &mut Vec<String>) -> Rule {
    let triggers = &def.prompt_triggers;

    Rule {
        name: name.to_string(),
        priority: def.priority,
        keywords: triggers
            .keywords
            .iter()
            .filter_map(|k| KeywordPhrase::new(k))
            .collect(),
        intent_patterns: compile_patterns(name, &triggers.intent_patterns, warnings),
        exclude_patterns: compile_patterns(name, &triggers.exclude_patterns, warnings),
        skip_prefixes: def
            .skip_conditions
            .commands
            .iter()
            .filter(|c| !c.trim().is_empty())
            .map(|c| c.to_lowercase())
            .collect(),
    }
}

/// Compile case-insensitive patterns, dropping the ones that fail
fn compile_patterns(rule: &str, patterns: &[String], warnings: &mut Vec<String>) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|pattern| {
            match RegexBuilder::new(pattern).case_insensitive(true).build() {
                Ok(re) => Some(re),
                Err(e) => {
                    warnings.push(format!(
                        "rule '{}': invalid pattern '{}': {}",
                        rule, pattern, e
                    ));
                    None
                }
            }
        })
        .collect()
}

/// Unknown or non-string priorities fall back to the default tier
fn lenient_priority<'de, D>(deserializer: D) -> Result<Priority, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .and_then(Priority::parse)
        .unwrap_or_default())
}

/// Deserialize a JSON object into (key, value) pairs keeping document order.
/// A repeated key replaces the earlier value in place.
fn ordered_entries<'de, D>(deserializer: D) -> Result<Vec<(String, Value)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct EntriesVisitor;

    impl<'de> Visitor<'de> for EntriesVisitor {
        type Value = Vec<(String, Value)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of rule name to rule definition")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries: Vec<(String, Value)> = Vec::new();
            while let Some((name, value)) = map.next_entry::<String, Value>()? {
                match entries.iter_mut().find(|(existing, _)| *existing == name) {
                    Some(slot) => slot.1 = value,
                    None => entries.push((name, value)),
                }
            }
            Ok(entries)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(EntriesVisitor)
}
