//! Integration tests for the semgrep command gate
//!
//! The validator is a throwaway shell script so the real process
//! plumbing (arguments, exit status, stderr, timeout) is exercised.

#![cfg(unix)]

use std::path::Path;
use std::time::{Duration, Instant};

use claude_skill_gate::audit::Mode;
use claude_skill_gate::config::ValidatorConfig;
use claude_skill_gate::gate::{CommandGate, GateState};
use claude_skill_gate::hook::Invocation;
use claude_skill_gate::{Config, HookEnv};
use tempfile::TempDir;

use crate::{bash_json, run, write_script};

const SEMGREP_CMD: &str = "docker run semgrep/semgrep scan";

/// Config whose validator runs `script` and records every call in `calls.log`
fn config_with_validator(dir: &Path, body: &str) -> Config {
    let script = write_script(
        dir,
        "validate_command.sh",
        &format!("echo \"$@\" >> '{}/calls.log'\n{}", dir.display(), body),
    );

    let mut config = Config::default();
    // keep discovery inside the temp dir
    config.gate.workspace_dirs = vec!["workspace".to_string()];
    config.gate.validator = ValidatorConfig {
        program: "/bin/sh".to_string(),
        script: Some(script.to_string_lossy().into_owned()),
        args: vec!["--strict".to_string()],
        timeout_secs: 2,
    };
    config
}

fn validator_calls(dir: &Path) -> Vec<String> {
    std::fs::read_to_string(dir.join("calls.log"))
        .map(|s| s.lines().map(String::from).collect())
        .unwrap_or_default()
}

fn guard(config: &Config, env: &HookEnv, command: &str) -> claude_skill_gate::HookOutput {
    run(&Invocation::new(Mode::Guard), &bash_json(command), config, env)
}

// ============================================================================
// Literal scenarios
// ============================================================================

#[test]
fn test_validator_pass_is_silent() {
    let tmp = TempDir::new().unwrap();
    let config = config_with_validator(tmp.path(), "exit 0");

    let output = guard(&config, &HookEnv::at(tmp.path()), SEMGREP_CMD);
    assert!(output.is_silent());
    assert_eq!(output.exit_code, 0);

    let calls = validator_calls(tmp.path());
    assert_eq!(calls.len(), 1);
    assert!(calls[0].starts_with("--command docker run semgrep/semgrep scan --strict"));
    assert!(!calls[0].contains("--config-path"));
}

#[test]
fn test_validator_rejection_blocks() {
    let tmp = TempDir::new().unwrap();
    let config = config_with_validator(tmp.path(), "echo 'missing --severity flag' >&2\nexit 1");

    let output = guard(&config, &HookEnv::at(tmp.path()), SEMGREP_CMD);
    assert_eq!(output.exit_code, 2);
    assert!(output.stdout.is_none());

    let message = output.stderr.unwrap();
    assert!(message.contains("SEMGREP EXECUTION BLOCKED"));
    assert!(message.contains("missing --severity flag"));
    assert!(message.contains("resolve_paths.py"));
    assert!(message.contains("generate_command.py"));
    assert!(message.contains("eval \"$DOCKER_CMD\""));
    assert!(message.contains("export SKIP_SEMGREP_VALIDATION=1"));
}

#[test]
fn test_escape_hatch_skips_validator() {
    let tmp = TempDir::new().unwrap();
    let config = config_with_validator(tmp.path(), "echo 'missing --severity flag' >&2\nexit 1");

    let mut env = HookEnv::at(tmp.path());
    env.skip_validation = true;

    let output = guard(&config, &env, SEMGREP_CMD);
    assert!(output.is_silent());
    assert_eq!(output.exit_code, 0);
    assert!(validator_calls(tmp.path()).is_empty());
}

#[test]
fn test_unrelated_command_skips_validator() {
    let tmp = TempDir::new().unwrap();
    let config = config_with_validator(tmp.path(), "exit 1");

    let output = guard(&config, &HookEnv::at(tmp.path()), "ls -la");
    assert!(output.is_silent());
    assert!(validator_calls(tmp.path()).is_empty());
}

// ============================================================================
// Detection
// ============================================================================

#[test]
fn test_detection_needs_both_markers() {
    let tmp = TempDir::new().unwrap();
    let config = config_with_validator(tmp.path(), "exit 1");
    let env = HookEnv::at(tmp.path());

    assert!(guard(&config, &env, "semgrep scan --config auto").is_silent());
    assert!(guard(&config, &env, "docker run alpine echo hi").is_silent());
    assert!(validator_calls(tmp.path()).is_empty());

    // case-insensitive, either order
    assert_eq!(guard(&config, &env, "SEMGREP=1 DOCKER   RUN img").exit_code, 2);
}

#[test]
fn test_non_bash_tools_pass() {
    let tmp = TempDir::new().unwrap();
    let config = config_with_validator(tmp.path(), "exit 1");

    let json = r#"{"tool_name":"Read","tool_input":{"file_path":"docker run semgrep"}}"#;
    let output = run(&Invocation::new(Mode::Guard), json, &config, &HookEnv::at(tmp.path()));
    assert!(output.is_silent());
}

// ============================================================================
// Validator failure modes
// ============================================================================

#[test]
fn test_missing_validator_script_fails_open() {
    let tmp = TempDir::new().unwrap();
    let mut config = Config::default();
    config.gate.validator.script = Some(tmp.path().join("nope.py").to_string_lossy().into_owned());

    let output = guard(&config, &HookEnv::at(tmp.path()), SEMGREP_CMD);
    assert!(output.is_silent());
}

#[test]
fn test_missing_validator_program_fails_open() {
    let tmp = TempDir::new().unwrap();
    let mut config = Config::default();
    config.gate.validator = ValidatorConfig {
        program: "/nonexistent/validator-bin".to_string(),
        script: None,
        args: Vec::new(),
        timeout_secs: 2,
    };

    let output = guard(&config, &HookEnv::at(tmp.path()), SEMGREP_CMD);
    assert!(output.is_silent());
}

#[test]
fn test_validator_timeout_blocks() {
    let tmp = TempDir::new().unwrap();
    let mut config = config_with_validator(tmp.path(), "exec sleep 5");
    config.gate.validator.timeout_secs = 1;

    let output = guard(&config, &HookEnv::at(tmp.path()), SEMGREP_CMD);
    assert_eq!(output.exit_code, 2);
    assert!(output.stderr.unwrap().contains("timed out"));
}

#[test]
fn test_background_helper_cannot_outlive_timeout() {
    let tmp = TempDir::new().unwrap();
    let mut config = config_with_validator(tmp.path(), "sleep 8 &\necho 'bad flag' >&2\nexit 1");
    config.gate.validator.timeout_secs = 1;

    let started = Instant::now();
    let output = guard(&config, &HookEnv::at(tmp.path()), SEMGREP_CMD);
    assert!(started.elapsed() < Duration::from_secs(4));
    assert_eq!(output.exit_code, 2);
    assert!(output.stderr.unwrap().contains("timed out"));
}

#[test]
fn test_silent_rejection_reports_status() {
    let tmp = TempDir::new().unwrap();
    let config = config_with_validator(tmp.path(), "exit 3");

    let output = guard(&config, &HookEnv::at(tmp.path()), SEMGREP_CMD);
    assert_eq!(output.exit_code, 2);
    assert!(output.stderr.unwrap().contains("validator exited with status 3"));
}

#[test]
fn test_dry_run_reports_without_blocking() {
    let tmp = TempDir::new().unwrap();
    let config = config_with_validator(tmp.path(), "echo 'bad mount' >&2\nexit 1");

    let mut invocation = Invocation::new(Mode::Guard);
    invocation.dry_run = true;
    let output = run(&invocation, &bash_json(SEMGREP_CMD), &config, &HookEnv::at(tmp.path()));
    assert_eq!(output.exit_code, 0);
    assert!(output.stderr.unwrap().contains("bad mount"));
}

// ============================================================================
// Contextual config discovery
// ============================================================================

#[test]
fn test_config_file_passed_to_validator() {
    let tmp = TempDir::new().unwrap();
    let nested = tmp.path().join("workspace/run-1/settings");
    std::fs::create_dir_all(&nested).unwrap();
    std::fs::write(nested.join("config.json"), "{}").unwrap();

    let config = config_with_validator(tmp.path(), "exit 0");
    let output = guard(&config, &HookEnv::at(tmp.path()), SEMGREP_CMD);
    assert!(output.is_silent());

    let calls = validator_calls(tmp.path());
    assert_eq!(calls.len(), 1);
    assert!(calls[0].contains("--config-path"));
    assert!(calls[0].contains("workspace/run-1/settings/config.json"));
}

#[test]
fn test_gate_state_terminals() {
    let tmp = TempDir::new().unwrap();
    let config = config_with_validator(tmp.path(), "echo nope >&2\nexit 1");
    let gate = CommandGate::new(config.gate.clone(), HookEnv::at(tmp.path()));

    assert_eq!(gate.evaluate("ls"), GateState::Idle);
    match gate.evaluate(SEMGREP_CMD) {
        GateState::Invalid { detail, config_path } => {
            assert_eq!(detail.trim(), "nope");
            assert!(config_path.is_none());
        }
        other => panic!("expected Invalid, got {:?}", other),
    }
}
