//! Chat-completion HTTP client
//!
//! Thin client for the external LLM completion API. One POST with the fixed
//! chat-completion envelope, a hard timeout, and no retries: a timeout or
//! non-2xx response is surfaced to the caller as an [`AdvisorError`].

use serde::{Deserialize, Serialize};

use crate::config::defaults::ADVISOR_ERROR_BODY_LIMIT;
use crate::config::AdvisorConfig;

/// Advisor client errors
#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: status {status}. {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("malformed API response: no completion choices")]
    MalformedResponse,
    #[error("API token not set (expected in ${0})")]
    MissingToken(String),
}

/// One message in the chat-completion envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f64,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// HTTP client for the external chat-completion API.
#[derive(Clone, Debug)]
pub struct CompletionClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl CompletionClient {
    /// Build a client from config, reading the API token from the
    /// environment variable the config names.
    pub fn from_config(config: &AdvisorConfig) -> Result<Self, AdvisorError> {
        let api_key = std::env::var(&config.token_env)
            .map_err(|_| AdvisorError::MissingToken(config.token_env.clone()))?;
        Ok(Self::new(config, api_key))
    }

    /// Build a client with an explicit API key.
    #[allow(clippy::expect_used)]
    pub fn new(config: &AdvisorConfig, api_key: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    /// Send one completion request and return the first choice's text.
    ///
    /// No retry, no backoff: a timeout maps to `AdvisorError::Http`, a
    /// non-2xx status to `AdvisorError::Api` with a truncated body excerpt.
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String, AdvisorError> {
        let payload = CompletionRequest {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let resp = self
            .http
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let body = body.chars().take(ADVISOR_ERROR_BODY_LIMIT).collect();
            return Err(AdvisorError::Api { status, body });
        }

        let completion: CompletionResponse = resp.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(AdvisorError::MalformedResponse)
    }

    /// Ask a fleet question: wraps the user message and the fleet context
    /// into a single prompt and completes it.
    pub async fn ask(
        &self,
        user_message: &str,
        fleet_context: &str,
    ) -> Result<String, AdvisorError> {
        let prompt = format!(
            "The user asks: {user_message}\n\n\
             Fleet context:\n{fleet_context}\n\n\
             Give a short but informative answer. Structure it in bullet \
             points if the question needs detail. Always take the fleet \
             context into account."
        );
        self.complete(&[ChatMessage::user(prompt)]).await
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
