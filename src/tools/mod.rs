pub mod cli;
pub mod command;
pub mod info;
pub mod modules;
pub mod status;

use std::sync::Arc;

use regex::Regex;
use rmcp::model::Tool;
use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;
use serde_json::Value;

use crate::request::OutputFilter;

pub use cli::CliRequest;
pub use command::CommandRequest;

pub type JsonObject = serde_json::Map<String, Value>;

/// Text returned when a command succeeds without printing anything
pub const EMPTY_OUTPUT_PLACEHOLDER: &str = "Command executed successfully with no output";

/// Text returned when the command printed something but the filter dropped every line
pub const NO_MATCHING_LINES: &str = "Command produced output but no lines passed the output filter";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Info,
    Command,
    Cli,
    ListModules,
    Status,
}

/// Static description of one tool: its name, what it does and what it accepts.
#[derive(Debug)]
pub struct OperationDescriptor {
    pub operation: Operation,
    pub name: &'static str,
    pub description: &'static str,
    input_schema: fn() -> JsonObject,
}

impl OperationDescriptor {
    pub fn input_schema(&self) -> JsonObject {
        (self.input_schema)()
    }

    pub fn to_tool(&self) -> Tool {
        Tool::new(self.name, self.description, Arc::new(self.input_schema()))
    }
}

/// Arguments of the tools that take none
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct NoArguments {}

fn schema_of<T: JsonSchema>() -> JsonObject {
    match serde_json::to_value(schemars::schema_for!(T)) {
        Ok(Value::Object(schema)) => schema,
        _ => JsonObject::new(),
    }
}

pub static OPERATIONS: [OperationDescriptor; 5] = [
    OperationDescriptor {
        operation: Operation::Info,
        name: "info",
        description: "Get information about the WebHare installation: installation and data root paths and whether they, the wh CLI and its shell functions exist",
        input_schema: schema_of::<NoArguments>,
    },
    OperationDescriptor {
        operation: Operation::Command,
        name: "command",
        description: "Execute a shell command line in the WebHare installation directory",
        input_schema: schema_of::<CommandRequest>,
    },
    OperationDescriptor {
        operation: Operation::Cli,
        name: "cli",
        description: "Execute a WebHare CLI command (bin/wh <command> <args...>) with the WebHare environment set up",
        input_schema: schema_of::<CliRequest>,
    },
    OperationDescriptor {
        operation: Operation::ListModules,
        name: "list_modules",
        description: "List all installed WebHare modules",
        input_schema: schema_of::<NoArguments>,
    },
    OperationDescriptor {
        operation: Operation::Status,
        name: "status",
        description: "Check if WebHare is installed and running",
        input_schema: schema_of::<NoArguments>,
    },
];

pub fn lookup(name: &str) -> Option<&'static OperationDescriptor> {
    OPERATIONS.iter().find(|descriptor| descriptor.name == name)
}

pub fn tools() -> Vec<Tool> {
    OPERATIONS.iter().map(OperationDescriptor::to_tool).collect()
}

/// Filtered output as returned to the caller, never empty
pub(crate) fn render(output: String, filter: &OutputFilter, grep: Option<&Regex>) -> String {
    if output.is_empty() {
        return EMPTY_OUTPUT_PLACEHOLDER.to_string();
    }
    let filtered = filter.apply(grep, output);
    if filtered.is_empty() {
        NO_MATCHING_LINES.to_string()
    } else {
        filtered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn required(schema: &JsonObject) -> Vec<&str> {
        schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_registry_has_five_unique_described_operations() {
        let names: Vec<&str> = OPERATIONS.iter().map(|d| d.name).collect();
        assert_eq!(names, ["info", "command", "cli", "list_modules", "status"]);
        assert_eq!(names.iter().collect::<HashSet<_>>().len(), OPERATIONS.len());
        assert!(OPERATIONS.iter().all(|d| !d.description.is_empty()));
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("cli").map(|d| d.operation), Some(Operation::Cli));
        assert!(lookup("wh_cli").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn test_schemas_are_objects() {
        for descriptor in &OPERATIONS {
            let schema = descriptor.input_schema();
            assert_eq!(schema.get("type"), Some(&Value::from("object")), "{}", descriptor.name);
        }
    }

    #[test]
    fn test_command_schema_requires_command() {
        let schema = lookup("command").unwrap().input_schema();
        assert_eq!(required(&schema), ["command"]);
        let properties = schema.get("properties").and_then(Value::as_object).unwrap();
        assert!(properties.contains_key("grep_pattern"));
    }

    #[test]
    fn test_cli_schema_args_optional_string_array() {
        let schema = lookup("cli").unwrap().input_schema();
        assert_eq!(required(&schema), ["command"]);
        let args = &schema["properties"]["args"];
        assert_eq!(args["type"], "array");
        assert_eq!(args["items"]["type"], "string");
    }

    #[test]
    fn test_tools_expose_all_operations() {
        let tools = tools();
        assert_eq!(tools.len(), 5);
        assert_eq!(tools[2].name, "cli");
    }

    #[test]
    fn test_placeholder_only_for_empty_output() {
        let none = OutputFilter::default();
        assert_eq!(render(String::new(), &none, None), EMPTY_OUTPUT_PLACEHOLDER);
        assert_eq!(render("hi".to_string(), &none, None), "hi");
    }

    #[test]
    fn test_filter_dropping_everything_is_not_empty_output() {
        let grep = Regex::new("^nomatch$").unwrap();
        let filter = OutputFilter {
            grep_pattern: Some("^nomatch$".to_string()),
            ..Default::default()
        };
        assert_eq!(render("modA\nmodB".to_string(), &filter, Some(&grep)), NO_MATCHING_LINES);

        let head_zero = OutputFilter {
            head: Some(0),
            ..Default::default()
        };
        assert_eq!(render("modA".to_string(), &head_zero, None), NO_MATCHING_LINES);
        assert_eq!(render(String::new(), &head_zero, None), EMPTY_OUTPUT_PLACEHOLDER);
    }
}
