//! Live answer provider backed by an OpenAI-compatible chat completion API
//!
//! Each question is a single blocking round-trip: the provider owns a
//! current-thread tokio runtime and waits on the request, bounded by the
//! configured timeout. Failures never escape [`AnswerProvider::ask`]; they are
//! logged and replaced by the mock answer with an error prefix.

use super::{is_arithmetic_question, AnswerProvider, MockProvider, Persona, ARITHMETIC_REFUSAL};
use crate::config::ProviderConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Runtime;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Prefix put in front of the mock answer when the live call fails
pub const FALLBACK_PREFIX: &str = "[LLM Error / fallback mock]";

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Invalid API key")]
    InvalidApiKey,
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),
    #[error("Response contained no answer")]
    EmptyResponse,
    #[error("Failed to start runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

impl ChatMessage {
    fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: content.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

pub struct LiveProvider {
    persona: Persona,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    timeout_secs: u64,
    client: reqwest::Client,
    runtime: Runtime,
    fallback: MockProvider,
}

impl LiveProvider {
    pub fn new(
        config: &ProviderConfig,
        api_key: String,
        persona: Persona,
    ) -> Result<Self, ProviderError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            persona,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            timeout_secs: config.timeout_secs,
            client: reqwest::Client::new(),
            runtime,
            fallback: MockProvider::new(persona),
        })
    }

    async fn complete(&self, question: &str) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage::new("system", self.persona.system_prompt()),
                ChatMessage::new("user", question),
            ],
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            return Err(match status.as_u16() {
                401 => ProviderError::InvalidApiKey,
                429 => ProviderError::RateLimitExceeded,
                code => ProviderError::Api { status: code, body },
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(ProviderError::EmptyResponse)
    }

    /// One blocking round-trip to the API.
    pub fn try_ask(&self, question: &str) -> Result<String, ProviderError> {
        let limit = Duration::from_secs(self.timeout_secs);
        self.runtime
            .block_on(async { timeout(limit, self.complete(question)).await })
            .map_err(|_| ProviderError::Timeout(self.timeout_secs))?
    }
}

impl AnswerProvider for LiveProvider {
    fn name(&self) -> &str {
        "live"
    }

    fn ask(&self, question: &str) -> String {
        if is_arithmetic_question(question) {
            return ARITHMETIC_REFUSAL.to_string();
        }

        debug!(model = %self.model, "asking live provider");
        match self.try_ask(question) {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, "live provider failed, answering from mock");
                format!("{} {}", FALLBACK_PREFIX, self.fallback.ask(question))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_for(server: &mockito::Server) -> LiveProvider {
        let config = ProviderConfig {
            base_url: server.url(),
            timeout_secs: 5,
            ..ProviderConfig::default()
        };
        LiveProvider::new(&config, "sk-test".to_string(), Persona::Concise).unwrap()
    }

    #[test]
    fn test_successful_completion() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices":[{"message":{"role":"assistant","content":"  Answer: Tokyo \n"}}]}"#,
            )
            .create();

        let provider = provider_for(&server);
        assert_eq!(provider.ask("What is the capital of Japan?"), "Answer: Tokyo");
        mock.assert();
    }

    #[test]
    fn test_api_error_falls_back_to_mock() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .with_body("boom")
            .create();

        let provider = provider_for(&server);
        assert!(matches!(
            provider.try_ask("What is the capital of France?"),
            Err(ProviderError::Api { status: 500, .. })
        ));
        assert_eq!(
            provider.ask("What is the capital of France?"),
            "[LLM Error / fallback mock] Answer: Paris"
        );
    }

    #[test]
    fn test_unauthorized_and_empty_responses() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .create();
        let provider = provider_for(&server);
        assert!(matches!(
            provider.try_ask("hi"),
            Err(ProviderError::InvalidApiKey)
        ));

        let mut server = mockito::Server::new();
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[]}"#)
            .create();
        let provider = provider_for(&server);
        assert!(matches!(
            provider.try_ask("hi"),
            Err(ProviderError::EmptyResponse)
        ));
    }

    #[test]
    fn test_arithmetic_never_reaches_the_api() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/chat/completions")
            .expect(0)
            .create();

        let provider = provider_for(&server);
        assert_eq!(provider.ask("15 + 23"), ARITHMETIC_REFUSAL);
        mock.assert();
    }
}
