//! Prompts for the selection and narration calls.

use std::fmt::Write;

use rate_tools::ToolDescriptor;
use serde_json::Value;

/// Reply format the selection model is asked for.
pub const SELECTION_INSTRUCTIONS: &str = r#"Choose the right tool and provide arguments in JSON:
{
    "tool": "tool-name",
    "arguments": {"argument-name": "value"}
}
Respond with JSON only. No explanation."#;

/// Persona for the narration call.
pub const NARRATION_INSTRUCTIONS: &str = "As a user-friendly currency interpreter, \
explain it in a way the user will understand. Avoid unnecessary information and use the data \
at hand to provide a user-friendly answer.";

/// Build the tool selection prompt from the live catalog and the user's query.
///
/// Each tool is listed as `- name: description`, followed by its arguments
/// with type and default when the schema declares them.
pub fn selection_prompt(query: &str, tools: &[ToolDescriptor]) -> String {
    let mut prompt = String::from("You have access to these tools:\n");

    for tool in tools {
        let _ = writeln!(prompt, "- {}: {}", tool.name, tool.description);
        for argument in describe_arguments(&tool.input_schema) {
            let _ = writeln!(prompt, "    - {}", argument);
        }
    }

    let _ = writeln!(prompt, "User's question: {}", query);
    prompt.push_str(SELECTION_INSTRUCTIONS);
    prompt
}

/// Build the narration prompt around the raw tool output.
pub fn narration_prompt(tool_output: &str) -> String {
    format!(
        "The tool returned the following data:\n{}\n{}",
        tool_output, NARRATION_INSTRUCTIONS
    )
}

fn describe_arguments(schema: &Value) -> Vec<String> {
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return Vec::new();
    };

    properties
        .iter()
        .map(|(name, spec)| {
            let kind = match spec.get("type").and_then(Value::as_str) {
                Some("array") => "list of strings",
                Some(other) => other,
                None => "any",
            };
            match spec.get("default") {
                Some(Value::String(default)) => {
                    format!("{} ({}, default \"{}\")", name, kind, default)
                }
                Some(default) => format!("{} ({}, default {})", name, kind, default),
                None => format!("{} ({}, optional)", name, kind),
            }
        })
        .collect()
}
