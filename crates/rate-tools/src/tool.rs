//! Tool trait definition and types.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::ToolError;
use crate::record::ToolOutput;

/// Arguments passed to a tool for execution.
#[derive(Debug, Clone, Default)]
pub struct ToolArgs {
    /// Parameters as key-value pairs.
    pub params: HashMap<String, Value>,
}

impl ToolArgs {
    /// Create new tool arguments with the given parameters.
    pub fn new(params: HashMap<String, Value>) -> Self {
        Self { params }
    }

    /// Get a string parameter, returning an error if missing or not a string.
    pub fn get_string(&self, key: &str) -> Result<String, ToolError> {
        self.params
            .get(key)
            .ok_or_else(|| ToolError::InvalidParameter {
                name: key.to_string(),
                reason: "missing".to_string(),
            })?
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| ToolError::InvalidParameter {
                name: key.to_string(),
                reason: "expected string".to_string(),
            })
    }

    /// Get an optional string parameter. `null` counts as absent.
    pub fn get_string_opt(&self, key: &str) -> Result<Option<String>, ToolError> {
        match self.params.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.get_string(key).map(Some),
        }
    }

    /// Get a string parameter, falling back to `default` when absent.
    pub fn get_string_or(&self, key: &str, default: &str) -> Result<String, ToolError> {
        Ok(self
            .get_string_opt(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// Get a list of strings. Accepts a JSON array or a comma-separated string.
    /// Empty entries are dropped; absent means an empty list.
    pub fn get_string_list(&self, key: &str) -> Result<Vec<String>, ToolError> {
        let items: Vec<String> = match self.params.get(key) {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::String(s)) => s.split(',').map(|item| item.to_string()).collect(),
            Some(Value::Array(values)) => values
                .iter()
                .map(|v| {
                    v.as_str()
                        .map(|s| s.to_string())
                        .ok_or_else(|| ToolError::InvalidParameter {
                            name: key.to_string(),
                            reason: "expected array of strings".to_string(),
                        })
                })
                .collect::<Result<_, _>>()?,
            Some(_) => {
                return Err(ToolError::InvalidParameter {
                    name: key.to_string(),
                    reason: "expected array or comma-separated string".to_string(),
                })
            }
        };

        Ok(items
            .into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect())
    }
}

/// Kind of value a parameter takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    StringList,
}

/// One declared tool parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolParam {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: ParamKind,
    pub default: Option<&'static str>,
}

impl ToolParam {
    /// A string parameter with a default.
    pub const fn string(
        name: &'static str,
        description: &'static str,
        default: &'static str,
    ) -> Self {
        Self {
            name,
            description,
            kind: ParamKind::String,
            default: Some(default),
        }
    }

    /// An optional list-of-strings parameter.
    pub const fn string_list(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            kind: ParamKind::StringList,
            default: None,
        }
    }

    fn schema(&self) -> Value {
        let mut schema = match self.kind {
            ParamKind::String => json!({"type": "string"}),
            ParamKind::StringList => json!({"type": "array", "items": {"type": "string"}}),
        };
        if let Value::Object(ref mut map) = schema {
            map.insert("description".to_string(), json!(self.description));
            if let Some(default) = self.default {
                map.insert("default".to_string(), json!(default));
            }
        }
        schema
    }
}

/// Name, description and input schema of a tool, as advertised to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// JSON Schema object for a parameter list. Nothing is required since
/// every parameter has a default or is optional.
pub fn input_schema(params: &[ToolParam]) -> Value {
    let properties: Map<String, Value> = params
        .iter()
        .map(|p| (p.name.to_string(), p.schema()))
        .collect();
    json!({
        "type": "object",
        "properties": properties,
        "required": [],
    })
}

/// Trait for rate tools exposed to the orchestrator.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The tool's unique name (used for dispatch).
    fn name(&self) -> &str;

    /// Human-readable description of what the tool does.
    fn description(&self) -> &str;

    /// Declared parameters, in display order.
    fn params(&self) -> &[ToolParam];

    /// Execute the tool with the given arguments.
    async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError>;

    /// Descriptor advertised by `tools/list`.
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: input_schema(self.params()),
        }
    }
}
