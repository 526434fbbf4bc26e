//! Client for the external text generation service.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use fintrack_core::assistant::{AssistantError, ChatMessage};
use fintrack_shared::AppError;
use fintrack_shared::config::AssistantConfig;

/// Produces assistant replies for a system prompt and conversation.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Returns the raw reply text.
    async fn generate(
        &self,
        system_prompt: &str,
        messages: &[ChatMessage],
    ) -> Result<String, AssistantError>;
}

#[derive(Debug, Serialize)]
struct GenerationPayload<'a> {
    settings: GenerationSettings<'a>,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Serialize)]
struct GenerationSettings<'a> {
    response_length: &'a str,
    temperature: &'a serde_json::Number,
    system_prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerationReply {
    content: ReplyContent,
}

#[derive(Debug, Deserialize)]
struct ReplyContent {
    content: String,
}

/// Generation client speaking JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGenerationClient {
    http: reqwest::Client,
    endpoint: String,
    response_length: String,
    temperature: serde_json::Number,
}

impl HttpGenerationClient {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if the temperature is not a number or the
    /// HTTP client cannot be built.
    pub fn new(config: &AssistantConfig) -> Result<Self, AppError> {
        let temperature = serde_json::Number::from_str(config.temperature.trim()).map_err(|_| {
            AppError::Internal(format!(
                "assistant temperature `{}` is not a number",
                config.temperature
            ))
        })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            response_length: config.response_length.clone(),
            temperature,
        })
    }
}

#[async_trait]
impl GenerationClient for HttpGenerationClient {
    async fn generate(
        &self,
        system_prompt: &str,
        messages: &[ChatMessage],
    ) -> Result<String, AssistantError> {
        let payload = GenerationPayload {
            settings: GenerationSettings {
                response_length: &self.response_length,
                temperature: &self.temperature,
                system_prompt,
            },
            messages,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AssistantError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssistantError::Unavailable(format!(
                "generation service returned {status}"
            )));
        }

        let reply: GenerationReply = response
            .json()
            .await
            .map_err(|e| AssistantError::MalformedReply(e.to_string()))?;

        Ok(reply.content.content)
    }
}
