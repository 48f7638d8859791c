//! claude-skill-gate - Skill activation and command validation hooks for Claude Code
//!
//! This library backs three hooks:
//!
//! - **Skill activation** (`UserPromptSubmit`): matches the prompt against a
//!   JSON rule file and prints a priority-grouped list of skills to use
//! - **Command gate** (`PreToolUse`): holds back `docker run ... semgrep`
//!   commands until an external validator approves them
//! - **Rule post-processing** (`PostToolUse`): hands structured rule output
//!   of a sub-agent to the parser script and summarises the result
//!
//! Every decision is recorded in a JSONL audit log.
//!
//! # Example
//!
//! ```
//! use claude_skill_gate::{ActivationEngine, RuleSet};
//! use claude_skill_gate::engine::ReportOptions;
//!
//! let rules = RuleSet::from_json(r#"{
//!     "skills": {
//!         "semgrep-execution": {
//!             "priority": "critical",
//!             "promptTriggers": { "keywords": ["semgrep"] }
//!         }
//!     }
//! }"#).unwrap();
//!
//! let engine = ActivationEngine::new(rules, ReportOptions::default());
//! let decision = engine.activate("Run Semgrep on src/");
//! assert!(decision.is_advise());
//! assert!(decision.report().unwrap().contains("semgrep-execution"));
//! ```

pub mod audit;
pub mod config;
pub mod engine;
pub mod error;
pub mod gate;
pub mod hook;
pub mod input;
pub mod output;
pub mod postprocess;
pub mod process;
pub mod redact;
pub mod rules;

// Re-exports for convenience
pub use config::{Config, HookEnv};
pub use engine::{ActivationEngine, MatchResult};
pub use gate::CommandGate;
pub use input::{HookInput, ToolInput};
pub use output::{Decision, HookOutput};
pub use rules::{Priority, RuleSet};
