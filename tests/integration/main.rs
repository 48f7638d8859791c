//! Integration tests for claude-skill-gate

mod gate_tests;
mod postprocess_tests;

use std::path::{Path, PathBuf};

use claude_skill_gate::audit::AuditLogger;
use claude_skill_gate::hook::{self, Invocation};
use claude_skill_gate::{Config, HookEnv, HookOutput};

/// Run one invocation without an audit log
pub fn run(invocation: &Invocation, stdin: &str, config: &Config, env: &HookEnv) -> HookOutput {
    let mut logger = AuditLogger::default();
    hook::run(invocation, stdin, config, env, &mut logger)
}

/// Write an executable shell script
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

/// Hook JSON for a Bash tool call
pub fn bash_json(command: &str) -> String {
    serde_json::json!({
        "session_id": "it-session",
        "hook_event_name": "PreToolUse",
        "tool_name": "Bash",
        "tool_input": { "command": command }
    })
    .to_string()
}

/// Hook JSON for a submitted prompt
pub fn prompt_json(prompt: &str) -> String {
    serde_json::json!({
        "session_id": "it-session",
        "hook_event_name": "UserPromptSubmit",
        "prompt": prompt
    })
    .to_string()
}
