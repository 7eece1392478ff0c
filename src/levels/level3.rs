//! Level 3: the multi-step agent

use super::{Assistant, Level};
use crate::agent::{Memory, Router};
use crate::provider::AnswerProvider;
use tracing::{info, warn};

pub struct AgentAssistant {
    router: Router,
    json_output: bool,
    last_memory: Memory,
}

impl AgentAssistant {
    pub fn new(provider: Box<dyn AnswerProvider>) -> Self {
        Self::with_router(Router::new(provider))
    }

    pub fn with_router(router: Router) -> Self {
        Self {
            router,
            json_output: false,
            last_memory: Memory::new(),
        }
    }

    /// Respond with the step memory as JSON instead of the text summary.
    pub fn with_json_output(mut self, json_output: bool) -> Self {
        self.json_output = json_output;
        self
    }

    /// Steps produced by the most recent query
    pub fn last_memory(&self) -> &Memory {
        &self.last_memory
    }
}

impl Assistant for AgentAssistant {
    fn level(&self) -> Level {
        Level::Three
    }

    fn respond(&mut self, query: &str) -> String {
        let (memory, summary) = self.router.process(query);
        info!(
            steps = memory.len(),
            provider = self.router.provider_name(),
            "agent query processed"
        );

        let response = if self.json_output {
            match serde_json::to_string_pretty(&memory) {
                Ok(json) => json,
                Err(e) => {
                    warn!(error = %e, "could not serialize step memory, using text summary");
                    summary
                }
            }
        } else {
            summary
        };
        self.last_memory = memory;
        response
    }
}
