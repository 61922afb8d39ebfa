//! Recovering a tool call from free-text model output.
//!
//! Models wrap JSON in markdown fences, add a sentence before it, or trail
//! extra braces. Recovery strips one surrounding fence, tries a strict parse,
//! then falls back to the first balanced `{...}` object in the text.
//! Anything else is a [`DispatchError::MalformedSelection`].

use serde_json::{Map, Value};

use crate::error::DispatchError;
use crate::types::ToolCall;

/// Remove one surrounding code fence: a leading ```` ``` ```` with an optional
/// language tag, and a trailing ```` ``` ````. Text without fences is returned
/// trimmed.
pub fn strip_code_fence(reply: &str) -> &str {
    let mut text = reply.trim();

    if let Some(rest) = text.strip_prefix("```") {
        let tag_len = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        let rest = &rest[tag_len..];
        text = rest.strip_prefix('\n').unwrap_or(rest);
    }

    if let Some(rest) = text.strip_suffix("```") {
        text = rest.strip_suffix('\n').unwrap_or(rest);
    }

    text
}

/// Extract a balanced JSON object from a string that starts with `{`.
///
/// Braces inside string literals are ignored. Returns `None` when the
/// object never closes.
fn extract_balanced_json(s: &str) -> Option<&str> {
    if !s.starts_with('{') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in s.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&s[..=i]);
                }
            }
            _ => {}
        }
    }

    None
}

fn parse_object(text: &str) -> Option<Map<String, Value>> {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(text) {
        return Some(map);
    }

    let start = text.find('{')?;
    let candidate = extract_balanced_json(&text[start..])?;
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Parse a selection reply into a [`ToolCall`].
pub fn parse_tool_call(reply: &str) -> Result<ToolCall, DispatchError> {
    let text = strip_code_fence(reply);
    let malformed = || DispatchError::MalformedSelection {
        raw: text.to_string(),
    };

    let mut object = parse_object(text).ok_or_else(malformed)?;

    let tool = match object.remove("tool") {
        Some(Value::String(tool)) if !tool.trim().is_empty() => tool,
        _ => return Err(malformed()),
    };

    let arguments = match object.remove("arguments") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(arguments)) => arguments,
        Some(_) => return Err(malformed()),
    };

    Ok(ToolCall { tool, arguments })
}
