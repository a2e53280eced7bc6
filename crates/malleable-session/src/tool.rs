//! Tool execution indicators shown inline in assistant messages.

use serde_json::Value;

const SUMMARY_MAX_CHARS: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStatus {
    Running,
    Done,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolIndicator {
    pub name: String,
    pub args_summary: String,
    status: ToolStatus,
}

impl ToolIndicator {
    pub fn running(name: impl Into<String>, args: &Value) -> Self {
        let name = name.into();
        Self {
            args_summary: summarize_args(&name, args),
            name,
            status: ToolStatus::Running,
        }
    }

    pub fn status(&self) -> ToolStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == ToolStatus::Running
    }

    /// Resolve a running indicator. Returns `false` if it was already final.
    pub fn finish(&mut self, is_error: bool) -> bool {
        if !self.is_running() {
            return false;
        }
        self.status = if is_error {
            ToolStatus::Error
        } else {
            ToolStatus::Done
        };
        true
    }
}

/// Short description of a tool call: the most relevant argument for known
/// tools, otherwise a truncated JSON dump.
pub fn summarize_args(tool: &str, args: &Value) -> String {
    let fields: &[&str] = match tool {
        "read" | "write" | "edit" => &["path", "file"],
        "bash" => &["command"],
        "grep" => &["pattern"],
        "find" => &["pattern", "glob"],
        "ls" => &["path"],
        _ => &[],
    };

    match args {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        _ if !fields.is_empty() => fields
            .iter()
            .find_map(|f| args.get(*f).and_then(Value::as_str).filter(|s| !s.is_empty()))
            .unwrap_or_default()
            .to_string(),
        _ => args.to_string().chars().take(SUMMARY_MAX_CHARS).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn known_tools_pick_their_field() {
        assert_eq!(summarize_args("read", &json!({"path": "src/main.rs"})), "src/main.rs");
        assert_eq!(summarize_args("edit", &json!({"file": "a.txt"})), "a.txt");
        assert_eq!(summarize_args("bash", &json!({"command": "cargo fmt"})), "cargo fmt");
        assert_eq!(summarize_args("find", &json!({"glob": "*.rs"})), "*.rs");
        assert_eq!(summarize_args("find", &json!({"pattern": "x", "glob": "*.rs"})), "x");
        assert_eq!(summarize_args("ls", &json!({})), "");
        assert_eq!(summarize_args("grep", &Value::Null), "");
    }

    #[test]
    fn string_args_are_verbatim() {
        assert_eq!(summarize_args("render", &json!("<html>")), "<html>");
    }

    #[test]
    fn unknown_tools_dump_truncated_json() {
        assert_eq!(summarize_args("render", &json!({"a": 1})), r#"{"a":1}"#);
        let long = json!({ "html": "é".repeat(200) });
        let summary = summarize_args("render", &long);
        assert_eq!(summary.chars().count(), SUMMARY_MAX_CHARS);
        assert!(summary.starts_with(r#"{"html":"éé"#));
    }

    #[test]
    fn indicator_resolves_once() {
        let mut t = ToolIndicator::running("bash", &json!({"command": "ls"}));
        assert_eq!(t.args_summary, "ls");
        assert!(t.finish(true));
        assert!(!t.finish(false));
        assert_eq!(t.status(), ToolStatus::Error);
    }
}
