//! Answer providers: "ask a language model a question"
//!
//! Two interchangeable backends share the [`AnswerProvider`] trait. The mock
//! is deterministic and offline; the live backend talks to an
//! OpenAI-compatible chat completion endpoint. [`select_provider`] picks one
//! once at startup from the presence of an API key.
//!
//! Neither backend ever computes arithmetic: arithmetic-shaped questions get
//! [`ARITHMETIC_REFUSAL`] back verbatim.

use crate::config::ProviderConfig;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{info, warn};

pub mod live;
pub mod mock;

pub use live::{LiveProvider, ProviderError};
pub use mock::MockProvider;

/// Returned for any arithmetic-shaped question.
pub const ARITHMETIC_REFUSAL: &str =
    "I can't compute arithmetic in Level 1.\nHint: please use the calculator tool in the next level.";

static DIRECT_MATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:[-+*/x×=().,]|\d|\s|what\s+is|what's|calculate|compute|add|plus|minus|times|multiply|multiplied|divide|divided|by|and|sum|difference|product|quotient|of|subtract|from)+\?*\s*$",
    )
    .expect("valid math regex")
});

/// True when the question is nothing but an arithmetic statement.
pub fn is_arithmetic_question(question: &str) -> bool {
    question.chars().any(|c| c.is_ascii_digit()) && DIRECT_MATH.is_match(question.trim())
}

/// Which assistant a provider is answering for. Drives the system prompt
/// and the shape of mock answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persona {
    /// Numbered reasoning followed by `Answer:`
    StepByStep,
    /// A single `Answer:` line
    Concise,
    /// Bare fact, used inside agent step summaries
    Agent,
}

impl Persona {
    pub fn system_prompt(self) -> &'static str {
        match self {
            Persona::StepByStep => {
                "You are a helpful assistant. Always think step-by-step and present a clear, \
                 numbered reasoning list followed by a short final answer starting with 'Answer:'. \
                 If the user asks for arithmetic like '15 + 23', do NOT compute; instead, politely \
                 refuse and suggest using a calculator tool."
            }
            Persona::Concise => {
                "You are a helpful assistant. For non-math questions, answer clearly and concisely. \
                 For math, the PROGRAM will call tools, not you."
            }
            Persona::Agent => {
                "You are an agent that completes multi-step tasks by describing each step and \
                 keeping a brief memory. Answer the single question you are given in one short \
                 sentence."
            }
        }
    }
}

/// Question-answering strategy
pub trait AnswerProvider {
    /// Backend name for logs and banners
    fn name(&self) -> &str;

    /// Answer `question`. Never empty, never fails.
    fn ask(&self, question: &str) -> String;
}

/// Build the provider for this process: live when an API key is configured,
/// mock otherwise. A live backend that cannot be constructed degrades to the
/// mock.
pub fn select_provider(config: &ProviderConfig, persona: Persona) -> Box<dyn AnswerProvider> {
    match &config.api_key {
        Some(api_key) => match LiveProvider::new(config, api_key.clone(), persona) {
            Ok(provider) => {
                info!(
                    model = %config.model,
                    base_url = %config.base_url,
                    "using live answer provider"
                );
                Box::new(provider)
            }
            Err(e) => {
                warn!(error = %e, "live answer provider unavailable, using mock");
                Box::new(MockProvider::new(persona))
            }
        },
        None => {
            info!("no API key configured, using mock answer provider");
            Box::new(MockProvider::new(persona))
        }
    }
}
