//! Core traits and types for the stepwise tool system

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Error types for tool operations
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid arguments: {message}")]
    InvalidArgs { message: String },
    #[error("Tool not found: {name}")]
    ToolNotFound { name: String },
    #[error("Tool '{name}' failed: {message}")]
    ExecutionFailed { name: String, message: String },
}

/// Arguments passed to tool execution
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolArgs {
    pub args: Vec<String>,
    pub named_args: HashMap<String, String>,
}

impl ToolArgs {
    /// Create ToolArgs from command line arguments
    pub fn from_args(args: &[&str]) -> Self {
        let mut positional = Vec::new();
        let mut named = HashMap::new();

        for &arg in args {
            if let Some(flag) = arg.strip_prefix("--") {
                if let Some(eq) = flag.find('=') {
                    named.insert(flag[..eq].to_string(), flag[eq + 1..].to_string());
                } else {
                    // Flag without value; store as true
                    named.insert(flag.to_string(), "true".to_string());
                }
            } else {
                positional.push(arg.to_string());
            }
        }

        Self {
            args: positional,
            named_args: named,
        }
    }

    /// Builder-style helper for a single named argument
    pub fn named(mut self, key: &str, value: impl Into<String>) -> Self {
        self.named_args.insert(key.to_string(), value.into());
        self
    }

    /// Get positional argument by index
    pub fn get_arg(&self, index: usize) -> Option<&String> {
        self.args.get(index)
    }

    /// Get named argument
    pub fn get_named_arg(&self, name: &str) -> Option<&String> {
        self.named_args.get(name)
    }

    /// Named argument first, then all positional arguments joined by spaces
    pub fn text(&self, name: &str) -> Option<String> {
        if let Some(value) = self.get_named_arg(name) {
            return Some(value.clone());
        }
        if self.args.is_empty() {
            None
        } else {
            Some(self.args.join(" "))
        }
    }

    /// Get argument count
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Check if arguments are empty
    pub fn is_empty(&self) -> bool {
        self.args.is_empty() && self.named_args.is_empty()
    }
}

/// Result returned by tool execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

impl ToolResult {
    /// Create successful result
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    /// Create successful result with data
    pub fn success_with_data(message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Create error result
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }

    /// Create error result with data
    pub fn error_with_data(message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Numeric `result` field of the data payload, if any
    pub fn number(&self) -> Option<f64> {
        self.data.as_ref()?.get("result")?.as_f64()
    }
}

/// Main trait for all tools
pub trait Tool: Send + Sync {
    /// Get the tool name
    fn name(&self) -> &str;

    /// Get the tool description
    fn description(&self) -> &str;

    /// Get the tool usage/signature
    fn signature(&self) -> &str;

    /// Validate arguments before execution
    fn validate_args(&self, args: &ToolArgs) -> Result<(), ToolError>;

    /// Execute the tool with given arguments
    fn execute(&mut self, args: &ToolArgs) -> Result<ToolResult>;

    /// Get OpenAI function schema for this tool
    fn get_openai_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name(),
                "description": self.description(),
                "parameters": self.get_parameters_schema()
            }
        })
    }

    /// Get parameters schema - should be overridden by implementing tools
    fn get_parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }
}

/// Registry for managing available tools
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Execute a tool by name
    pub fn execute_tool(&mut self, name: &str, args: &ToolArgs) -> Result<ToolResult, ToolError> {
        let tool = self
            .tools
            .get_mut(name)
            .ok_or_else(|| ToolError::ToolNotFound {
                name: name.to_string(),
            })?;

        tool.validate_args(args)?;

        tool.execute(args).map_err(|e| ToolError::ExecutionFailed {
            name: name.to_string(),
            message: e.to_string(),
        })
    }

    /// List all registered tool names, sorted
    pub fn list_tools(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get tool by name
    pub fn get_tool(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Get OpenAI function schemas for all tools, in name order
    pub fn get_all_schemas(&self) -> Vec<serde_json::Value> {
        self.list_tools()
            .iter()
            .filter_map(|name| self.get_tool(name))
            .map(|tool| tool.get_openai_schema())
            .collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
