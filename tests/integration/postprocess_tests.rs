//! Integration tests for rule output post-processing

#![cfg(unix)]

use std::path::Path;

use claude_skill_gate::audit::Mode;
use claude_skill_gate::hook::Invocation;
use claude_skill_gate::postprocess::{RuleOutputProcessor, TestResult, END_MARKER, START_MARKER};
use claude_skill_gate::{Config, HookEnv};
use tempfile::TempDir;

use crate::{run, write_script};

/// Parser double: checks the staged file, then reports like the real one
const PARSER: &str = r#"
[ "$1" = "--input" ] || { echo "bad args: $*" >&2; exit 1; }
grep -q "SEMGREP_RULE_OUTPUT_START" "$2" || { echo "no block in $2" >&2; exit 1; }
echo "Created file: rules/sqli.yaml"
echo "Created file: rules/sqli.py"
if [ "$SEMGREP_AUTO_TEST" = "true" ]; then
    echo "Test command succeeded"
fi
"#;

fn agent_output() -> String {
    format!(
        "Here are the rules.\n{}\nrules:\n  - id: sqli\n{}\nDone.",
        START_MARKER, END_MARKER
    )
}

fn config_with_parser(dir: &Path, body: &str) -> Config {
    let script = write_script(dir, "parse_output.sh", body);
    let mut config = Config::default();
    config.postprocess.parser_program = "/bin/sh".to_string();
    config.postprocess.parser_script = Some(script.to_string_lossy().into_owned());
    config.postprocess.timeout_secs = 5;
    config
}

#[test]
fn test_processes_rule_block() {
    let tmp = TempDir::new().unwrap();
    let config = config_with_parser(tmp.path(), PARSER);
    let processor = RuleOutputProcessor::new(config.postprocess, HookEnv::at(tmp.path()));

    let result = processor.process(&agent_output());
    assert!(result.success, "errors: {:?}", result.errors);
    assert_eq!(result.files_created, vec!["rules/sqli.yaml", "rules/sqli.py"]);
    assert_eq!(result.test_result, Some(TestResult::Passed));

    // staged copy is removed afterwards
    assert!(!tmp.path().join("workspace/temp_agent_output.txt").exists());
}

#[test]
fn test_auto_test_disabled() {
    let tmp = TempDir::new().unwrap();
    let mut config = config_with_parser(tmp.path(), PARSER);
    config.postprocess.auto_test = false;
    let processor = RuleOutputProcessor::new(config.postprocess, HookEnv::at(tmp.path()));

    let result = processor.process(&agent_output());
    assert!(result.success);
    assert_eq!(result.test_result, None);
}

#[test]
fn test_parser_failure_reported() {
    let tmp = TempDir::new().unwrap();
    let config = config_with_parser(tmp.path(), "echo 'yaml error on line 3' >&2\nexit 1");
    let processor = RuleOutputProcessor::new(config.postprocess, HookEnv::at(tmp.path()));

    let result = processor.process(&agent_output());
    assert!(!result.success);
    assert!(result.errors[0].contains("yaml error on line 3"));
    assert!(result.render().contains("failed"));
}

#[test]
fn test_parser_timeout_reported() {
    let tmp = TempDir::new().unwrap();
    let mut config = config_with_parser(tmp.path(), "exec sleep 5");
    config.postprocess.timeout_secs = 1;
    let processor = RuleOutputProcessor::new(config.postprocess, HookEnv::at(tmp.path()));

    let result = processor.process(&agent_output());
    assert_eq!(result.errors, vec!["parser timed out".to_string()]);
}

#[test]
fn test_hook_json_response() {
    let tmp = TempDir::new().unwrap();
    let config = config_with_parser(tmp.path(), PARSER);

    let json = serde_json::json!({
        "hook_event_name": "PostToolUse",
        "tool_name": "Task",
        "tool_input": { "prompt": "write a rule", "subagent_type": "semgrep-rule-engineer" },
        "tool_response": { "content": [{ "type": "text", "text": agent_output() }] }
    })
    .to_string();

    let output = run(&Invocation::new(Mode::Postprocess), &json, &config, &HookEnv::at(tmp.path()));
    assert_eq!(output.exit_code, 0);
    let summary = output.stdout.unwrap();
    assert!(summary.contains("succeeded"));
    assert!(summary.contains("- `rules/sqli.yaml`"));
}

#[test]
fn test_response_without_block_is_silent() {
    let tmp = TempDir::new().unwrap();
    let config = config_with_parser(tmp.path(), "exit 1");

    let json = r#"{"tool_name":"Task","tool_response":"just a normal answer"}"#;
    let output = run(&Invocation::new(Mode::Postprocess), json, &config, &HookEnv::at(tmp.path()));
    assert!(output.is_silent());
}

#[test]
fn test_raw_text_mode() {
    let tmp = TempDir::new().unwrap();
    let config = config_with_parser(tmp.path(), PARSER);

    let mut invocation = Invocation::new(Mode::Postprocess);
    invocation.raw_text = true;

    let output = run(&invocation, &agent_output(), &config, &HookEnv::at(tmp.path()));
    assert!(output.stdout.unwrap().contains("rules/sqli.py"));

    // raw mode always reports, even without a block
    let output = run(&invocation, "nothing here", &config, &HookEnv::at(tmp.path()));
    assert!(output.stdout.unwrap().contains("no valid SEMGREP_RULE_OUTPUT block found"));
}
