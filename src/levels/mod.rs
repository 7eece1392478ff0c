//! The three assistants, from answer-only up to the multi-step agent

use crate::config::Config;
use crate::provider::{select_provider, Persona};
use std::fmt;

pub mod level1;
pub mod level2;
pub mod level3;

pub use level1::LlmOnlyAssistant;
pub use level2::{CalculatorAssistant, MIXED_REQUEST_REFUSAL};
pub use level3::AgentAssistant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    One,
    Two,
    Three,
}

impl Level {
    pub fn number(self) -> u8 {
        match self {
            Level::One => 1,
            Level::Two => 2,
            Level::Three => 3,
        }
    }

    pub fn log_file_name(self) -> String {
        format!("level{}_log.txt", self.number())
    }

    pub fn title(self) -> &'static str {
        match self {
            Level::One => "Level 1 - LLM-only assistant",
            Level::Two => "Level 2 - LLM + Calculator Tool",
            Level::Three => "Level 3 - Full Agent",
        }
    }

    pub fn persona(self) -> Persona {
        match self {
            Level::One => Persona::StepByStep,
            Level::Two => Persona::Concise,
            Level::Three => Persona::Agent,
        }
    }

    /// Fixed example prompts for `--demo`
    pub fn demo_prompts(self) -> &'static [&'static str] {
        match self {
            Level::One => &[
                "What are the colors in a rainbow?",
                "Tell me why the sky is blue?",
                "Which planet is the hottest?",
                "What is 15 + 23?",
            ],
            Level::Two => &[
                "What is 15 + 23?",
                "Multiply 9 and 8",
                "What is the capital of France?",
                "Multiply 9 and 8, and also tell me the capital of Japan",
            ],
            Level::Three => &[
                "Translate 'Good Morning' into German, add 45 and 30, and tell me the distance between Earth and Mars",
                "Multiply 9 and 8, and also tell me the capital of Japan",
                "What is the capital of Italy?",
            ],
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "level{}", self.number())
    }
}

/// One level's question → answer behaviour
pub trait Assistant {
    fn level(&self) -> Level;

    /// Answer one query. Never fails; every error is folded into the text.
    fn respond(&mut self, query: &str) -> String;
}

/// Build the assistant for `level`, choosing the answer provider from config.
pub fn build_assistant(level: Level, config: &Config) -> Box<dyn Assistant> {
    let provider = select_provider(&config.provider, level.persona());
    match level {
        Level::One => Box::new(LlmOnlyAssistant::new(provider)),
        Level::Two => Box::new(CalculatorAssistant::new(provider)),
        Level::Three => Box::new(AgentAssistant::new(provider)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_names() {
        assert_eq!(Level::One.log_file_name(), "level1_log.txt");
        assert_eq!(Level::Two.log_file_name(), "level2_log.txt");
        assert_eq!(Level::Three.log_file_name(), "level3_log.txt");
    }

    #[test]
    fn test_build_assistant_offline() {
        let config = Config::default();
        for level in [Level::One, Level::Two, Level::Three] {
            let mut assistant = build_assistant(level, &config);
            assert_eq!(assistant.level(), level);
            for prompt in level.demo_prompts() {
                assert!(!assistant.respond(prompt).is_empty());
            }
        }
    }
}
