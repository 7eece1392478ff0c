//! Level 2: the language model plus a calculator tool
//!
//! Arithmetic goes to the `calculate` tool and never to the provider. A query
//! that mixes arithmetic with a second intent is refused as a whole: this
//! level handles one task at a time.

use super::{Assistant, Level};
use crate::agent::split_clauses;
use crate::core::{ToolArgs, ToolRegistry};
use crate::provider::AnswerProvider;
use crate::tools::calculator;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

pub const MIXED_REQUEST_REFUSAL: &str =
    "I can do a single task at a time at Level 2. Multi-step mixed queries aren't supported yet.";

pub const UNPARSEABLE_MATH_HINT: &str =
    "Please provide a simple expression like '12 * 7' or 'Add 45 and 30'.";

static MATH_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:add|plus|sum|times|multiply|multiplied|product|minus|subtract|difference|divide|divided|quotient)\b|\d\s*[-+*/x×]\s*\d",
    )
    .expect("valid math keyword regex")
});

static SECOND_INTENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:capital|translate|who\s+is)\b")
        .expect("valid intent regex")
});

/// Mentions an operator keyword or contains a parseable expression.
pub fn looks_like_math(query: &str) -> bool {
    calculator::parse(query).is_ok() || MATH_KEYWORDS.is_match(query)
}

/// Arithmetic combined with any second intent, either as a separate clause or
/// through a second-intent keyword.
pub fn is_mixed_request(query: &str) -> bool {
    if !looks_like_math(query) {
        return false;
    }
    let clauses = split_clauses(query);
    let has_other_clause = clauses.len() > 1 && clauses.iter().any(|c| !looks_like_math(c));
    has_other_clause || SECOND_INTENT.is_match(query)
}

pub struct CalculatorAssistant {
    registry: ToolRegistry,
    provider: Box<dyn AnswerProvider>,
}

impl CalculatorAssistant {
    pub fn new(provider: Box<dyn AnswerProvider>) -> Self {
        Self::with_registry(crate::create_tool_registry(), provider)
    }

    pub fn with_registry(registry: ToolRegistry, provider: Box<dyn AnswerProvider>) -> Self {
        Self { registry, provider }
    }

    fn calculate(&mut self, query: &str) -> String {
        let args = ToolArgs::default().named("expression", query);
        match self.registry.execute_tool("calculate", &args) {
            Ok(result) if result.success => format!("Calculator result: {}", result.message),
            Ok(result) => {
                let kind = result
                    .data
                    .as_ref()
                    .and_then(|d| d.get("error"))
                    .and_then(|e| e.as_str());
                if kind == Some("not_arithmetic") {
                    UNPARSEABLE_MATH_HINT.to_string()
                } else {
                    format!("Sorry, I couldn't compute that: {}", result.message)
                }
            }
            Err(e) => format!("Sorry, I couldn't compute that: {}", e),
        }
    }
}

impl Assistant for CalculatorAssistant {
    fn level(&self) -> Level {
        Level::Two
    }

    fn respond(&mut self, query: &str) -> String {
        if is_mixed_request(query) {
            debug!(query, "mixed request refused at level 2");
            return MIXED_REQUEST_REFUSAL.to_string();
        }
        if looks_like_math(query) {
            return self.calculate(query);
        }
        self.provider.ask(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{MockProvider, Persona};
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingProvider {
        calls: Rc<Cell<usize>>,
    }

    impl AnswerProvider for CountingProvider {
        fn name(&self) -> &str {
            "counting"
        }

        fn ask(&self, _question: &str) -> String {
            self.calls.set(self.calls.get() + 1);
            "Answer: counted".to_string()
        }
    }

    fn counting_assistant() -> (CalculatorAssistant, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let provider = CountingProvider {
            calls: Rc::clone(&calls),
        };
        (CalculatorAssistant::new(Box::new(provider)), calls)
    }

    #[test]
    fn test_arithmetic_uses_calculator_not_provider() {
        let (mut assistant, calls) = counting_assistant();
        assert_eq!(assistant.respond("Multiply 9 and 8"), "Calculator result: 72");
        assert_eq!(assistant.respond("15 + 23"), "Calculator result: 38");
        assert_eq!(assistant.respond("What is 15 + 23?"), "Calculator result: 38");
        assert_eq!(assistant.respond("Add 45 and 30"), "Calculator result: 75");
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_mixed_request_refused_verbatim() {
        let (mut assistant, calls) = counting_assistant();
        let answer = assistant.respond("Multiply 9 and 8, and also tell me the capital of Japan");
        assert_eq!(answer, MIXED_REQUEST_REFUSAL);
        assert!(!answer.contains("72") && !answer.contains("Tokyo"));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_mixed_detection() {
        assert!(is_mixed_request("add 2 and 3 then translate hello"));
        assert!(is_mixed_request("What is 4 * 5 and who is the president?"));
        assert!(!is_mixed_request("What is 15 + 23?"));
        assert!(!is_mixed_request("What is the capital of France?"));
        assert!(!is_mixed_request("Tell me 15 + 23"));
        assert!(!is_mixed_request("Can you explain 9 times 8?"));
        assert!(is_mixed_request("add 2 and 3, and tell me why the sky is blue"));
    }

    #[test]
    fn test_single_arithmetic_with_lead_in() {
        let (mut assistant, calls) = counting_assistant();
        assert_eq!(assistant.respond("Tell me 15 + 23"), "Calculator result: 38");
        assert_eq!(assistant.respond("Can you explain 9 times 8?"), "Calculator result: 72");
        assert_eq!(assistant.respond("12x7"), "Calculator result: 84");
        assert_eq!(assistant.respond("add 1,000 and 5"), "Calculator result: 1005");
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_math_errors_are_graceful() {
        let (mut assistant, _) = counting_assistant();
        assert_eq!(assistant.respond("add 1 and 2 and 3"), UNPARSEABLE_MATH_HINT);
        assert_eq!(
            assistant.respond("8 / 0"),
            "Sorry, I couldn't compute that: cannot divide by zero"
        );
    }

    #[test]
    fn test_non_math_goes_to_provider() {
        let mut assistant = CalculatorAssistant::new(Box::new(MockProvider::new(Persona::Concise)));
        assert_eq!(assistant.respond("What is the capital of France?"), "Answer: Paris");
    }
}
