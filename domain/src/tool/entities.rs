//! Tool domain entities

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Loose type of a tool argument, checked before execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    #[default]
    String,
    Integer,
    Number,
    Boolean,
}

impl ParamType {
    pub fn as_str(&self) -> &str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
        }
    }

    /// Whether `value` is acceptable for this type.
    ///
    /// Models often quote numbers, so numeric strings pass the numeric checks.
    pub fn accepts(&self, value: &serde_json::Value) -> bool {
        use serde_json::Value;
        match (self, value) {
            (ParamType::String, Value::String(_)) => true,
            (ParamType::String, Value::Number(_)) => true,
            (ParamType::Integer, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (ParamType::Integer, Value::String(s)) => s.trim().parse::<i64>().is_ok(),
            (ParamType::Number, Value::Number(_)) => true,
            (ParamType::Number, Value::String(s)) => s.trim().parse::<f64>().is_ok(),
            (ParamType::Boolean, Value::Bool(_)) => true,
            (ParamType::Boolean, Value::String(s)) => {
                matches!(s.trim(), "true" | "false")
            }
            _ => false,
        }
    }
}

impl std::fmt::Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Definition of a tool the expert agent can call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "search_ncbi")
    pub name: String,
    /// Human-readable description shown to the model
    pub description: String,
    /// Parameter specifications
    pub parameters: Vec<ToolParameter>,
}

/// Parameter specification for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    pub description: String,
    pub required: bool,
    pub param_type: ParamType,
    /// Value used when the argument is omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&ToolParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// One-line signature for prompts, e.g. `search_ncbi(database, term, max_results=10)`
    pub fn signature(&self) -> String {
        let params: Vec<String> = self
            .parameters
            .iter()
            .map(|p| match &p.default {
                Some(default) => format!("{}={}", p.name, default),
                None => p.name.clone(),
            })
            .collect();
        format!("{}({})", self.name, params.join(", "))
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: ParamType::String,
            default: None,
        }
    }

    pub fn with_type(mut self, param_type: ParamType) -> Self {
        self.param_type = param_type;
        self
    }

    /// Set a default; a parameter with a default is never required
    pub fn with_default(mut self, default: impl Into<serde_json::Value>) -> Self {
        self.default = Some(default.into());
        self.required = false;
        self
    }
}

/// Specification of available tools
#[derive(Debug, Clone, Default)]
pub struct ToolSpec {
    tools: BTreeMap<String, ToolDefinition>,
    /// Alias → canonical name mapping (e.g. "sparql" → "fetch_data")
    aliases: HashMap<String, String>,
}

impl ToolSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, tool: ToolDefinition) -> Self {
        self.tools.insert(tool.name.clone(), tool);
        self
    }

    pub fn register_alias(mut self, alias: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), canonical.into());
        self
    }

    pub fn register_aliases(
        mut self,
        mappings: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        for (alias, canonical) in mappings {
            self.aliases.insert(alias.into(), canonical.into());
        }
        self
    }

    /// Resolve a name: the canonical name if registered, else an alias target
    pub fn resolve<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        if self.tools.contains_key(name) {
            Some(name)
        } else {
            self.aliases
                .get(name)
                .map(|s| s.as_str())
                .filter(|canonical| self.tools.contains_key(*canonical))
        }
    }

    /// Get tool definition by canonical name or alias
    pub fn get_resolved(&self, name: &str) -> Option<&ToolDefinition> {
        self.resolve(name).and_then(|canonical| self.tools.get(canonical))
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    /// Tools in name order
    pub fn all(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.values()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Tool list rendered for a prompt, one tool per line
    pub fn describe(&self) -> String {
        self.all()
            .map(|t| format!("- {}: {}", t.signature(), t.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A call to a tool with arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool_name: String,
    pub arguments: HashMap<String, serde_json::Value>,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: HashMap::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Get a string argument; numbers are rendered as strings
    pub fn get_string(&self, key: &str) -> Option<String> {
        match self.arguments.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn require_string(&self, key: &str) -> Result<String, String> {
        self.get_string(key)
            .ok_or_else(|| format!("Missing required argument: {}", key))
    }

    /// Get an integer argument, accepting quoted integers
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        match self.arguments.get(key)? {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ncbi_search() -> ToolDefinition {
        ToolDefinition::new("search_ncbi", "Search an NCBI database")
            .with_parameter(ToolParameter::new("database", "Database name", true))
            .with_parameter(ToolParameter::new("term", "Search term", true))
            .with_parameter(
                ToolParameter::new("max_results", "Result limit", false)
                    .with_type(ParamType::Integer)
                    .with_default(10),
            )
    }

    #[test]
    fn test_signature() {
        assert_eq!(
            ncbi_search().signature(),
            "search_ncbi(database, term, max_results=10)"
        );
    }

    #[test]
    fn test_default_makes_optional() {
        let param = ToolParameter::new("x", "x", true).with_default("y");
        assert!(!param.required);
        assert_eq!(param.default, Some(json!("y")));
    }

    #[test]
    fn test_param_type_accepts() {
        assert!(ParamType::Integer.accepts(&json!(3)));
        assert!(ParamType::Integer.accepts(&json!("3")));
        assert!(!ParamType::Integer.accepts(&json!("three")));
        assert!(!ParamType::Integer.accepts(&json!(1.5)));
        assert!(ParamType::String.accepts(&json!("a")));
        assert!(ParamType::String.accepts(&json!(12345)));
        assert!(!ParamType::String.accepts(&json!(null)));
        assert!(ParamType::Boolean.accepts(&json!("true")));
        assert!(ParamType::Number.accepts(&json!(0.5)));
    }

    #[test]
    fn test_tool_spec_aliases() {
        let spec = ToolSpec::new()
            .register(ncbi_search())
            .register(ToolDefinition::new("fetch_data", "Run a SPARQL lookup"))
            .register_aliases([("esearch", "search_ncbi"), ("sparql", "fetch_data")])
            .register_alias("dangling", "missing_tool");

        assert_eq!(spec.resolve("search_ncbi"), Some("search_ncbi"));
        assert_eq!(spec.resolve("esearch"), Some("search_ncbi"));
        assert_eq!(spec.resolve("sparql"), Some("fetch_data"));
        assert_eq!(spec.resolve("dangling"), None);
        assert_eq!(spec.resolve("unknown"), None);
        assert_eq!(spec.get_resolved("sparql").unwrap().name, "fetch_data");
        assert!(spec.get("sparql").is_none());
    }

    #[test]
    fn test_describe_is_name_ordered() {
        let spec = ToolSpec::new()
            .register(ncbi_search())
            .register(ToolDefinition::new("fetch_data", "Run a SPARQL lookup"));
        let text = spec.describe();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("- fetch_data("));
        assert!(lines[1].contains("max_results=10"));
    }

    #[test]
    fn test_tool_call_getters() {
        let call = ToolCall::new("fetch_record")
            .with_arg("database", "gene")
            .with_arg("record_id", 7157)
            .with_arg("limit", "5");

        assert_eq!(call.get_string("database").as_deref(), Some("gene"));
        assert_eq!(call.get_string("record_id").as_deref(), Some("7157"));
        assert_eq!(call.get_i64("limit"), Some(5));
        assert!(call.require_string("missing").is_err());
    }
}
