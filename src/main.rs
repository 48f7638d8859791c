//! claude-skill-gate - Skill activation and command validation hooks
//!
//! # Usage
//!
//! ```bash
//! # UserPromptSubmit: suggest skills for a prompt
//! echo '{"prompt":"run a semgrep scan"}' | claude-skill-gate activate
//!
//! # PreToolUse: validate semgrep docker commands (exit 2 = blocked)
//! echo '{"tool_name":"Bash","tool_input":{"command":"docker run semgrep/semgrep scan"}}' \
//!     | claude-skill-gate guard
//!
//! # PostToolUse: process structured rule output of a sub-agent
//! claude-skill-gate postprocess --text < agent_output.txt
//! ```

use std::env;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use claude_skill_gate::{
    audit::{AuditLogger, Mode},
    config::{Config, HookEnv},
    hook::{self, Invocation},
};

/// Print version information
fn print_version() {
    println!("claude-skill-gate {}", env!("CARGO_PKG_VERSION"));
}

/// Print help message
fn print_help() {
    println!(
        r#"claude-skill-gate - Skill activation and command validation hooks

USAGE:
    claude-skill-gate <MODE> [OPTIONS]

MODES:
    activate                Match the prompt against skill rules (UserPromptSubmit)
    guard                   Validate semgrep docker commands (PreToolUse)
    postprocess             Process rule-engineer agent output (PostToolUse)

OPTIONS:
    -h, --help              Print this help message
    -v, --version           Print version information
    -c, --config PATH       Path to config file
    -r, --rules PATH        Path to skill rules file (activate)
    -d, --dry-run           Report blocks without blocking
        --text              Read raw agent text instead of hook JSON (postprocess)

ENVIRONMENT:
    CLAUDE_PROJECT_DIR          Project root (default: current directory)
    SKILL_GATE_RULES            Skill rules file override
    SKILL_GATE_DISABLED=1       Disable all checks (still logs)
    SKIP_SEMGREP_VALIDATION=1   Skip semgrep command validation

USAGE AS HOOK:
    Configure in .claude/settings.json:
    {{
      "hooks": {{
        "UserPromptSubmit": [{{ "hooks": [{{
          "type": "command",
          "command": "claude-skill-gate activate"
        }}] }}],
        "PreToolUse": [{{ "matcher": "Bash", "hooks": [{{
          "type": "command",
          "command": "claude-skill-gate guard"
        }}] }}]
      }}
    }}
"#
    );
}

/// Parse command line arguments
struct Args {
    help: bool,
    version: bool,
    mode: Option<Mode>,
    dry_run: bool,
    raw_text: bool,
    config_path: Option<String>,
    rules_path: Option<String>,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut result = Args {
            help: false,
            version: false,
            mode: None,
            dry_run: false,
            raw_text: false,
            config_path: None,
            rules_path: None,
        };

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "-h" | "--help" => result.help = true,
                "-v" | "--version" => result.version = true,
                "-d" | "--dry-run" => result.dry_run = true,
                "--text" => result.raw_text = true,
                "-c" | "--config" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.config_path = Some(args[i].clone());
                    }
                }
                "-r" | "--rules" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.rules_path = Some(args[i].clone());
                    }
                }
                arg if arg.starts_with("--config=") => {
                    result.config_path = Some(arg.trim_start_matches("--config=").to_string());
                }
                arg if arg.starts_with("--rules=") => {
                    result.rules_path = Some(arg.trim_start_matches("--rules=").to_string());
                }
                arg if !arg.starts_with('-') && result.mode.is_none() => {
                    result.mode = Mode::parse(arg);
                    if result.mode.is_none() {
                        result.help = true;
                    }
                }
                _ => {}
            }
            i += 1;
        }

        result
    }
}

fn main() {
    let args = Args::parse();

    if args.version {
        print_version();
        return;
    }

    let mode = match args.mode {
        Some(mode) if !args.help => mode,
        _ => {
            print_help();
            return;
        }
    };

    // Load configuration
    let config = if let Some(ref path) = args.config_path {
        Config::load_from(Path::new(path)).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config from {}: {}", path, e);
            Config::default()
        })
    } else {
        Config::load()
    };

    let hook_env = HookEnv::capture(&config);
    let mut logger = AuditLogger::new(config.audit_path().as_deref());

    let mut stdin = String::new();
    let _ = io::stdin().lock().read_to_string(&mut stdin);

    let invocation = Invocation {
        mode,
        dry_run: args.dry_run,
        raw_text: args.raw_text,
        rules_path: args.rules_path.map(PathBuf::from),
    };

    let output = hook::run(&invocation, &stdin, &config, &hook_env, &mut logger);
    std::process::exit(output.emit());
}
