//! Level 1: the language model alone, with arithmetic refused outright

use super::{Assistant, Level};
use crate::provider::{is_arithmetic_question, AnswerProvider, ARITHMETIC_REFUSAL};
use tracing::debug;

pub struct LlmOnlyAssistant {
    provider: Box<dyn AnswerProvider>,
}

impl LlmOnlyAssistant {
    pub fn new(provider: Box<dyn AnswerProvider>) -> Self {
        Self { provider }
    }
}

impl Assistant for LlmOnlyAssistant {
    fn level(&self) -> Level {
        Level::One
    }

    fn respond(&mut self, query: &str) -> String {
        if is_arithmetic_question(query) {
            debug!(query, "refusing arithmetic at level 1");
            return ARITHMETIC_REFUSAL.to_string();
        }
        self.provider.ask(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{MockProvider, Persona};

    struct PanickingProvider;

    impl AnswerProvider for PanickingProvider {
        fn name(&self) -> &str {
            "panicking"
        }

        fn ask(&self, question: &str) -> String {
            panic!("provider must not be asked: {}", question)
        }
    }

    #[test]
    fn test_refuses_arithmetic_before_provider() {
        let mut assistant = LlmOnlyAssistant::new(Box::new(PanickingProvider));
        for query in ["15 + 23", "What is 15 + 23?", "multiply 9 and 8"] {
            let answer = assistant.respond(query);
            assert_eq!(answer, ARITHMETIC_REFUSAL);
            assert!(!answer.contains("38") && !answer.contains("72"));
        }
    }

    #[test]
    fn test_answers_step_by_step() {
        let mut assistant = LlmOnlyAssistant::new(Box::new(MockProvider::new(Persona::StepByStep)));
        let answer = assistant.respond("What are the colors in a rainbow?");
        assert!(answer.starts_with("Step-by-step reasoning:"));
        assert!(answer.contains("Answer: Red, orange"));
    }
}
