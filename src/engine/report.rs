//! Priority-grouped activation report

use crate::engine::MatchResult;
use crate::rules::Priority;

const RULE_LINE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Default closing instruction of the report
pub const DEFAULT_ACTION_LINE: &str = "ACTION: Use Skill tool BEFORE responding";

/// Rendering options
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Least severe tier that is still rendered
    pub min_priority: Priority,

    /// Closing instruction line
    pub action_line: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            min_priority: Priority::Low,
            action_line: DEFAULT_ACTION_LINE.to_string(),
        }
    }
}

/// Heading of a priority group
pub fn group_label(priority: Priority) -> &'static str {
    match priority {
        Priority::Critical => "CRITICAL SKILLS (REQUIRED):",
        Priority::High => "RECOMMENDED SKILLS:",
        Priority::Medium => "SUGGESTED SKILLS:",
        Priority::Low => "OPTIONAL SKILLS:",
    }
}

/// Render a report with default options
pub fn render(result: &MatchResult) -> String {
    render_with(result, &ReportOptions::default()).unwrap_or_default()
}

/// Render a report, or None when no group survives the filter
pub fn render_with(result: &MatchResult, options: &ReportOptions) -> Option<String> {
    let groups: Vec<(Priority, Vec<&str>)> = Priority::ALL
        .iter()
        .filter(|p| p.includes(options.min_priority))
        .map(|p| (*p, result.names_with_priority(*p)))
        .filter(|(_, names)| !names.is_empty())
        .collect();

    if groups.is_empty() {
        return None;
    }

    let mut lines = vec![
        RULE_LINE.to_string(),
        "SKILL ACTIVATION CHECK".to_string(),
        RULE_LINE.to_string(),
        String::new(),
    ];

    for (priority, names) in groups {
        lines.push(group_label(priority).to_string());
        for name in names {
            lines.push(format!("  → {}", name));
        }
        lines.push(String::new());
    }

    lines.push(options.action_line.clone());
    lines.push(RULE_LINE.to_string());

    Some(lines.join("\n"))
}
