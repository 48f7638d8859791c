//! Post-processing of rule-authoring agent output
//!
//! When a sub-agent returns a structured rule block, the block is handed to
//! the parser script which writes the rule files and optionally runs their
//! tests. The outcome is summarised as markdown. Never blocks.

use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use crate::config::{HookEnv, PostprocessConfig};
use crate::error::ProcessError;
use crate::output::Decision;
use crate::process;

pub const START_MARKER: &str = "===== SEMGREP_RULE_OUTPUT_START =====";
pub const END_MARKER: &str = "===== SEMGREP_RULE_OUTPUT_END =====";

/// Stdout prefixes the parser prints for each file it created
const CREATED_FILE_MARKERS: &[&str] = &["✅ 创建文件:", "Created file:"];
const TEST_PASSED_MARKERS: &[&str] = &["测试命令执行成功", "Test command succeeded"];
const TEST_FAILED_MARKERS: &[&str] = &["测试命令执行失败", "Test command failed"];

const STAGED_FILE_NAME: &str = "temp_agent_output.txt";

/// Whether the text carries a complete structured rule block
pub fn has_rule_output(text: &str) -> bool {
    text.contains(START_MARKER) && text.contains(END_MARKER)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestResult {
    Passed,
    Failed,
}

/// Outcome of processing one agent output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessResult {
    pub success: bool,
    pub files_created: Vec<String>,
    pub test_result: Option<TestResult>,
    pub errors: Vec<String>,
}

impl ProcessResult {
    fn failed(error: impl Into<String>) -> Self {
        Self {
            errors: vec![error.into()],
            ..Self::default()
        }
    }

    /// Markdown summary
    pub fn render(&self) -> String {
        let mut lines = Vec::new();

        if self.success {
            lines.push("## ✅ Semgrep rule processing succeeded\n".to_string());

            if !self.files_created.is_empty() {
                lines.push("### Files created:".to_string());
                for file in &self.files_created {
                    lines.push(format!("- `{}`", file));
                }
                lines.push(String::new());
            }

            match self.test_result {
                Some(TestResult::Passed) => lines.push("### Test result: ✅ passed".to_string()),
                Some(TestResult::Failed) => lines.push("### Test result: ❌ failed".to_string()),
                None => {}
            }
        } else {
            lines.push("## ❌ Semgrep rule processing failed\n".to_string());
            if !self.errors.is_empty() {
                lines.push("### Errors:".to_string());
                for err in &self.errors {
                    lines.push(format!("- {}", err));
                }
            }
        }

        lines.join("\n")
    }
}

/// Extract created files and the test verdict from parser stdout
pub fn parse_parser_stdout(stdout: &str) -> (Vec<String>, Option<TestResult>) {
    let files = stdout
        .lines()
        .filter_map(|line| {
            CREATED_FILE_MARKERS
                .iter()
                .find_map(|marker| line.strip_prefix(marker))
                .map(|rest| rest.trim().to_string())
        })
        .filter(|path| !path.is_empty())
        .collect();

    let test_result = if TEST_PASSED_MARKERS.iter().any(|m| stdout.contains(m)) {
        Some(TestResult::Passed)
    } else if TEST_FAILED_MARKERS.iter().any(|m| stdout.contains(m)) {
        Some(TestResult::Failed)
    } else {
        None
    };

    (files, test_result)
}

/// Runs the parser over agent output
pub struct RuleOutputProcessor {
    config: PostprocessConfig,
    env: HookEnv,
}

impl RuleOutputProcessor {
    pub fn new(config: PostprocessConfig, env: HookEnv) -> Self {
        Self { config, env }
    }

    fn staging_path(&self) -> PathBuf {
        let dir = PathBuf::from(&self.config.workspace_dir);
        let dir = if dir.is_absolute() {
            dir
        } else {
            self.env.project_dir.join(dir)
        };
        dir.join(STAGED_FILE_NAME)
    }

    /// Process agent output; a missing block is reported as an error
    pub fn process(&self, agent_output: &str) -> ProcessResult {
        if !has_rule_output(agent_output) {
            return ProcessResult::failed("no valid SEMGREP_RULE_OUTPUT block found");
        }

        let staged = self.staging_path();
        if let Some(parent) = staged.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                return ProcessResult::failed(format!(
                    "could not create {}: {}",
                    parent.display(),
                    e
                ));
            }
        }
        if let Err(e) = std::fs::write(&staged, agent_output) {
            return ProcessResult::failed(format!("could not stage agent output: {}", e));
        }

        let result = self.run_parser(&staged);

        if staged.exists() {
            let _ = std::fs::remove_file(&staged);
        }

        result
    }

    fn run_parser(&self, staged: &std::path::Path) -> ProcessResult {
        let mut cmd = Command::new(&self.config.parser_program);

        if let Some(ref script) = self.config.parser_script {
            let script = self.env.resolve(script);
            if !script.exists() {
                return ProcessResult::failed(format!(
                    "parser script not found: {}",
                    script.display()
                ));
            }
            cmd.arg(script);
        }

        cmd.arg("--input").arg(staged).arg("--verbose");
        cmd.current_dir(&self.env.project_dir);
        if self.config.auto_test {
            cmd.env("SEMGREP_AUTO_TEST", "true");
        }

        match process::run_with_timeout(cmd, Duration::from_secs(self.config.timeout_secs)) {
            Ok(output) if output.success() => {
                let (files_created, test_result) = parse_parser_stdout(&output.stdout);
                ProcessResult {
                    success: true,
                    files_created,
                    test_result,
                    errors: Vec::new(),
                }
            }
            Ok(output) => {
                ProcessResult::failed(format!("parser failed: {}", output.stderr.trim()))
            }
            Err(ProcessError::Timeout(_)) => ProcessResult::failed("parser timed out"),
            Err(e) => ProcessResult::failed(format!("execution error: {}", e)),
        }
    }

    /// Hook entry point: silent unless a rule block is present
    pub fn check(&self, agent_output: &str) -> Decision {
        if !has_rule_output(agent_output) {
            return Decision::allow("no structured rule output");
        }
        Decision::advise(Vec::new(), self.process(agent_output).render())
    }
}
