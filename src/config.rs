//! Configuration loading for claude-skill-gate
//!
//! Supports TOML configuration with embedded defaults. Process environment
//! is captured once into [`HookEnv`] and passed down explicitly.

use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

use crate::engine::report::DEFAULT_ACTION_LINE;
use crate::rules::Priority;

/// Environment variable overriding the activation rule file
pub const RULES_ENV_VAR: &str = "SKILL_GATE_RULES";

/// Environment variable turning every mode into a no-op
pub const DISABLED_ENV_VAR: &str = "SKILL_GATE_DISABLED";

/// Environment variable naming the project root
pub const PROJECT_DIR_ENV_VAR: &str = "CLAUDE_PROJECT_DIR";

/// General configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable audit logging
    pub audit_log: bool,

    /// Path to audit log file
    pub audit_path: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            audit_log: true,
            audit_path: Some("~/.claude/skill-gate/audit.jsonl".to_string()),
        }
    }
}

/// Skill activation configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ActivationConfig {
    /// Rule file; defaults to `.claude/skills/skill-rules.json` in the project
    pub rules_file: Option<String>,

    /// Least severe priority tier that is reported
    pub min_priority: Priority,

    /// Closing line of the report
    pub action_line: String,
}

impl Default for ActivationConfig {
    fn default() -> Self {
        Self {
            rules_file: None,
            min_priority: Priority::Low,
            action_line: DEFAULT_ACTION_LINE.to_string(),
        }
    }
}

/// External validator invocation
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Program to run
    pub program: String,

    /// Script passed as first argument; missing script means no validator
    pub script: Option<String>,

    /// Extra arguments after `--command <cmd>`
    pub args: Vec<String>,

    /// Hard wall-clock limit
    pub timeout_secs: u64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            program: "python3".to_string(),
            script: Some(
                "$CLAUDE_PROJECT_DIR/.claude/skills/semgrep-execution/scripts/validate_command.py"
                    .to_string(),
            ),
            args: vec!["--strict".to_string()],
            timeout_secs: 10,
        }
    }
}

/// Command validation gate configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Escape-hatch variable name
    pub skip_env_var: String,

    /// Directories probed for the contextual config, relative to cwd
    pub workspace_dirs: Vec<String>,

    /// File name searched recursively inside the workspace
    pub config_file_name: String,

    /// Documentation pointer shown in the block message
    pub docs_path: String,

    pub validator: ValidatorConfig,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            skip_env_var: "SKIP_SEMGREP_VALIDATION".to_string(),
            workspace_dirs: vec!["workspace".to_string(), "../workspace".to_string()],
            config_file_name: "config.json".to_string(),
            docs_path: ".claude/skills/semgrep-execution/SKILL.md".to_string(),
            validator: ValidatorConfig::default(),
        }
    }
}

/// Rule-output post-processor configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PostprocessConfig {
    pub parser_program: String,
    pub parser_script: Option<String>,

    /// Where the agent output is staged, relative to the project dir
    pub workspace_dir: String,

    pub timeout_secs: u64,

    /// Ask the parser to run the generated tests
    pub auto_test: bool,
}

impl Default for PostprocessConfig {
    fn default() -> Self {
        Self {
            parser_program: "python3".to_string(),
            parser_script: Some(
                "$CLAUDE_PROJECT_DIR/scripts/parse_semgrep_agent_output.py".to_string(),
            ),
            workspace_dir: "workspace".to_string(),
            timeout_secs: 600,
            auto_test: true,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub activation: ActivationConfig,
    pub gate: GateConfig,
    pub postprocess: PostprocessConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load() -> Self {
        let config_paths = [
            dirs::home_dir().map(|p| p.join(".claude/skill-gate/config.toml")),
            Some(PathBuf::from("/etc/claude-skill-gate/config.toml")),
        ];

        for path in config_paths.into_iter().flatten() {
            if path.exists() {
                if let Ok(content) = std::fs::read_to_string(&path) {
                    match toml::from_str(&content) {
                        Ok(config) => return config,
                        Err(e) => {
                            eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
                        }
                    }
                }
            }
        }

        Config::default()
    }

    /// Load from a specific path
    pub fn load_from(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Expand `~/` in path strings
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Get the audit log path (expanded)
    pub fn audit_path(&self) -> Option<PathBuf> {
        if !self.general.audit_log {
            return None;
        }
        self.general.audit_path.as_deref().map(Self::expand_path)
    }

    /// Resolve the activation rule file.
    /// Precedence: explicit override, environment, config file, project default.
    pub fn rules_path(&self, env: &HookEnv, cli_override: Option<&Path>) -> PathBuf {
        if let Some(path) = cli_override {
            return path.to_path_buf();
        }
        if let Some(ref path) = env.rules_override {
            return path.clone();
        }
        if let Some(ref path) = self.activation.rules_file {
            return env.resolve(path);
        }
        env.project_dir.join(".claude/skills/skill-rules.json")
    }
}

/// Process environment captured once at startup
#[derive(Debug, Clone, Default)]
pub struct HookEnv {
    /// Working directory of the hook process
    pub cwd: PathBuf,

    /// Project root (`CLAUDE_PROJECT_DIR`, else cwd)
    pub project_dir: PathBuf,

    /// Rule file from `SKILL_GATE_RULES`
    pub rules_override: Option<PathBuf>,

    /// `SKILL_GATE_DISABLED` is set
    pub disabled: bool,

    /// The gate's escape hatch is set to a truthy value
    pub skip_validation: bool,
}

impl HookEnv {
    /// Capture from the real process environment
    pub fn capture(config: &Config) -> Self {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let project_dir = env::var_os(PROJECT_DIR_ENV_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| cwd.clone());

        Self {
            rules_override: env::var_os(RULES_ENV_VAR)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            disabled: env::var_os(DISABLED_ENV_VAR).is_some(),
            skip_validation: is_truthy(env::var(&config.gate.skip_env_var).ok().as_deref()),
            cwd,
            project_dir,
        }
    }

    /// Environment rooted at a directory, nothing else set
    pub fn at(dir: &Path) -> Self {
        Self {
            cwd: dir.to_path_buf(),
            project_dir: dir.to_path_buf(),
            ..Self::default()
        }
    }

    /// Expand `~/` and `$CLAUDE_PROJECT_DIR`, then anchor relative paths at cwd
    pub fn resolve(&self, path: &str) -> PathBuf {
        let project = self.project_dir.to_string_lossy();
        let substituted = path
            .replace("${CLAUDE_PROJECT_DIR}", &project)
            .replace("$CLAUDE_PROJECT_DIR", &project);
        let expanded = Config::expand_path(&substituted);
        if expanded.is_absolute() {
            expanded
        } else {
            self.cwd.join(expanded)
        }
    }
}

/// Set and non-empty
pub fn is_truthy(value: Option<&str>) -> bool {
    value.map(|v| !v.is_empty()).unwrap_or(false)
}

/// Embedded default configuration
pub const DEFAULT_CONFIG_TOML: &str = r#"
[general]
audit_log = true
audit_path = "~/.claude/skill-gate/audit.jsonl"

[activation]
min_priority = "low"
action_line = "ACTION: Use Skill tool BEFORE responding"

[gate]
skip_env_var = "SKIP_SEMGREP_VALIDATION"
workspace_dirs = ["workspace", "../workspace"]
config_file_name = "config.json"
docs_path = ".claude/skills/semgrep-execution/SKILL.md"

[gate.validator]
program = "python3"
script = "$CLAUDE_PROJECT_DIR/.claude/skills/semgrep-execution/scripts/validate_command.py"
args = ["--strict"]
timeout_secs = 10

[postprocess]
parser_program = "python3"
parser_script = "$CLAUDE_PROJECT_DIR/scripts/parse_semgrep_agent_output.py"
workspace_dir = "workspace"
timeout_secs = 600
auto_test = true
"#;
