use regex::Regex;
use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;

/// Optional post-processing of command output, shared by `command` and `cli`.
///
/// Steps run in a fixed order: grep, then head, then tail.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct OutputFilter {
    /// Optional regex pattern to filter output lines (keeps matching lines)
    #[serde(default)]
    pub grep_pattern: Option<String>,

    /// If true, invert grep to exclude matching lines instead of keeping them
    #[serde(default)]
    pub invert_grep: Option<bool>,

    /// Return only the first N lines of output
    #[serde(default)]
    pub head: Option<usize>,

    /// Return only the last N lines of output
    #[serde(default)]
    pub tail: Option<usize>,
}

impl OutputFilter {
    /// Compile the grep pattern, if any. Done before running anything so a
    /// bad pattern never costs a subprocess.
    pub fn compile(&self) -> Result<Option<Regex>, regex::Error> {
        self.grep_pattern.as_deref().map(Regex::new).transpose()
    }

    pub fn apply(&self, grep: Option<&Regex>, output: String) -> String {
        if grep.is_none() && self.head.is_none() && self.tail.is_none() {
            return output;
        }

        let invert = self.invert_grep.unwrap_or(false);
        let mut lines: Vec<&str> = output
            .lines()
            .filter(|line| grep.map_or(true, |re| re.is_match(line) != invert))
            .collect();

        if let Some(n) = self.head {
            lines.truncate(n);
        }
        if let Some(n) = self.tail {
            let skip = lines.len().saturating_sub(n);
            lines.drain(..skip);
        }
        lines.join("\n")
    }
}
