//! Match result of one activation evaluation

use crate::rules::Priority;

/// Rules matched by one input, each recorded once in arrival order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    matched: Vec<(String, Priority)>,
}

impl MatchResult {
    /// Record a rule unless it is already present.
    /// Returns false for a repeated name.
    pub fn record(&mut self, name: &str, priority: Priority) -> bool {
        if self.contains(name) {
            return false;
        }
        self.matched.push((name.to_string(), priority));
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.matched.iter().any(|(n, _)| n == name)
    }

    /// Priority a rule was recorded with
    pub fn priority_of(&self, name: &str) -> Option<Priority> {
        self.matched
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| *p)
    }

    pub fn is_empty(&self) -> bool {
        self.matched.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matched.len()
    }

    /// All matched names in arrival order
    pub fn names(&self) -> Vec<String> {
        self.matched.iter().map(|(n, _)| n.clone()).collect()
    }

    /// Names recorded with the given priority, in arrival order
    pub fn names_with_priority(&self, priority: Priority) -> Vec<&str> {
        self.matched
            .iter()
            .filter(|(_, p)| *p == priority)
            .map(|(n, _)| n.as_str())
            .collect()
    }
}
