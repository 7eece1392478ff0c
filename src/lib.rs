//! # stepwise - three levels of LLM tool use
//!
//! Progressively richer assistants built on the same pieces:
//!
//! - **Level 1**: the answer provider alone; arithmetic is refused
//! - **Level 2**: provider plus a calculator tool; mixed requests are refused
//! - **Level 3**: an agent that splits a query into steps and routes each one
//!   to a tool (calculator, translator, capitals table) or the provider
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stepwise::agent::Router;
//! use stepwise::provider::{MockProvider, Persona};
//!
//! let mut router = Router::new(Box::new(MockProvider::new(Persona::Agent)));
//! let (memory, summary) = router.process("Multiply 9 and 8, and also tell me the capital of Japan");
//! assert_eq!(memory.len(), 2);
//! println!("{}", summary);
//! ```

pub mod agent;
pub mod config;
pub mod core;
pub mod levels;
pub mod provider;
pub mod repl;
pub mod session;
pub mod tools;

// Re-export main types
pub use crate::core::{Tool, ToolArgs, ToolError, ToolRegistry, ToolResult};
pub use levels::{build_assistant, Assistant, Level};
pub use tools::{CalculatorTool, CapitalLookupTool, TranslateTool};

/// Initialize the tool registry with every available tool
pub fn create_tool_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    registry.register(Box::new(CalculatorTool::new()));
    registry.register(Box::new(TranslateTool::default()));
    registry.register(Box::new(CapitalLookupTool::default()));

    registry
}
