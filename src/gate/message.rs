//! Remediation message shown when a command is blocked

const HEAVY_RULE: &str =
    "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Helper-script sequence that produces a compliant command
pub const REMEDIATION_STEPS: &[&str] = &[
    "  # Step 1: resolve paths",
    "  RULES_PATH=$(python scripts/resolve_paths.py --type rules)",
    "  PROJECT_PATH=$(python scripts/resolve_paths.py --type project)",
    "",
    "  # Step 2: generate the standard command",
    "  DOCKER_CMD=$(python scripts/generate_command.py \\",
    "    --project-path \"$PROJECT_PATH\" \\",
    "    --rules-path \"$RULES_PATH\" \\",
    "    --severity WARNING)",
    "",
    "  # Step 3: run it (passes validation)",
    "  eval \"$DOCKER_CMD\"",
];

/// Inputs of the block message
#[derive(Debug, Clone)]
pub struct BlockMessage<'a> {
    /// Why validation failed
    pub detail: &'a str,

    /// Escape-hatch variable name
    pub skip_env_var: &'a str,

    /// Documentation pointer
    pub docs_path: &'a str,

    /// Validator invocation to re-check by hand
    pub recheck: Option<&'a str>,
}

impl BlockMessage<'_> {
    pub fn render(&self) -> String {
        let mut lines = vec![
            String::new(),
            HEAVY_RULE.to_string(),
            "SEMGREP EXECUTION BLOCKED".to_string(),
            HEAVY_RULE.to_string(),
            String::new(),
            "This Semgrep Docker command does not meet the execution requirements and was blocked."
                .to_string(),
            String::new(),
            self.detail.trim_end().to_string(),
            String::new(),
            HEAVY_RULE.to_string(),
            "Generate the command with the standard scripts instead".to_string(),
            HEAVY_RULE.to_string(),
            String::new(),
        ];

        lines.extend(REMEDIATION_STEPS.iter().map(|s| s.to_string()));
        lines.push(String::new());

        if let Some(recheck) = self.recheck {
            lines.push("Re-check a command by hand:".to_string());
            lines.push(format!("  {}", recheck));
            lines.push(String::new());
        }

        lines.push(format!("Documentation: {}", self.docs_path));
        lines.push(String::new());
        lines.push(format!(
            "To skip validation temporarily: export {}=1",
            self.skip_env_var
        ));
        lines.push(String::new());

        lines.join("\n")
    }
}
