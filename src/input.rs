//! Input parsing for Claude Code hook JSON format
//!
//! One document shape covers every hook event: `prompt` for
//! UserPromptSubmit, `tool_name`/`tool_input` for PreToolUse and
//! `tool_response` for PostToolUse.

use serde::Deserialize;
use serde_json::Value;

/// Main input structure from Claude Code hooks
#[derive(Debug, Default, Deserialize)]
pub struct HookInput {
    /// User prompt (UserPromptSubmit)
    #[serde(default)]
    pub prompt: Option<String>,

    /// Name of the tool being invoked (e.g., "Bash", "Task")
    #[serde(default)]
    pub tool_name: Option<String>,

    /// Tool-specific input parameters
    #[serde(default)]
    pub tool_input: Option<ToolInput>,

    /// Tool result (PostToolUse)
    #[serde(default)]
    pub tool_response: Option<Value>,

    /// Optional session identifier
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Tool-specific input variants
#[derive(Debug, Clone)]
pub enum ToolInput {
    /// Bash command execution
    Bash {
        command: String,
        #[allow(dead_code)]
        description: Option<String>,
    },

    /// Sub-agent invocation
    Task {
        prompt: String,
        subagent_type: Option<String>,
    },

    /// Unknown tool - pass through
    Unknown { raw: Value },
}

impl<'de> Deserialize<'de> for ToolInput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;

        if let Some(obj) = value.as_object() {
            if let Some(command) = obj.get("command").and_then(|v| v.as_str()) {
                return Ok(ToolInput::Bash {
                    command: command.to_string(),
                    description: obj
                        .get("description")
                        .and_then(|v| v.as_str())
                        .map(String::from),
                });
            }

            if let Some(prompt) = obj.get("prompt").and_then(|v| v.as_str()) {
                return Ok(ToolInput::Task {
                    prompt: prompt.to_string(),
                    subagent_type: obj
                        .get("subagent_type")
                        .and_then(|v| v.as_str())
                        .map(String::from),
                });
            }
        }

        Ok(ToolInput::Unknown { raw: value })
    }
}

impl HookInput {
    /// Parse input from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Prompt text, empty when absent
    pub fn prompt_text(&self) -> &str {
        self.prompt.as_deref().unwrap_or("")
    }

    pub fn tool_name(&self) -> &str {
        self.tool_name.as_deref().unwrap_or("")
    }

    /// The command of a Bash tool call
    pub fn bash_command(&self) -> Option<&str> {
        if self.tool_name() != "Bash" {
            return None;
        }
        match &self.tool_input {
            Some(ToolInput::Bash { command, .. }) => Some(command),
            _ => None,
        }
    }

    /// Text of a tool response.
    /// Accepts a plain string, a `content` array of text blocks, or an
    /// object carrying `text` or `output`.
    pub fn response_text(&self) -> Option<String> {
        let response = self.tool_response.as_ref()?;

        if let Some(text) = response.as_str() {
            return Some(text.to_string());
        }

        let content = response.get("content").unwrap_or(response);
        if let Some(blocks) = content.as_array() {
            let texts: Vec<&str> = blocks
                .iter()
                .filter_map(|block| match block {
                    Value::String(s) => Some(s.as_str()),
                    other => other.get("text").and_then(|t| t.as_str()),
                })
                .collect();
            if !texts.is_empty() {
                return Some(texts.join("\n"));
            }
        }

        ["text", "output"]
            .iter()
            .find_map(|key| response.get(*key).and_then(|v| v.as_str()))
            .map(String::from)
    }

    /// Get a summary of the input for logging
    pub fn summary(&self) -> String {
        if let Some(prompt) = self.prompt.as_deref() {
            return format!("Prompt: {}", truncate(prompt, 100));
        }
        match &self.tool_input {
            Some(ToolInput::Bash { command, .. }) => format!("Bash: {}", truncate(command, 100)),
            Some(ToolInput::Task { subagent_type, .. }) => format!(
                "Task: {}",
                subagent_type.as_deref().unwrap_or("general-purpose")
            ),
            _ => format!("Unknown tool: {}", self.tool_name()),
        }
    }
}

/// Truncate on a character boundary
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
