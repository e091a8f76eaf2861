//! OpenAI API Provider
//!
//! Insight text source using OpenAI's Chat Completions API.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::{InsightTextSource, build_client, send_json};
use crate::config::InsightConfig;
use crate::types::{Result, SourceError, SourceResult};

const SOURCE: &str = "openai";

const SYSTEM_PROMPT: &str = "You are an airline market analyst. Provide concise, actionable insights in the requested JSON format.";

/// OpenAI API Provider with secure API key handling
pub struct OpenAiProvider {
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    api_base: String,
    model: String,
    temperature: f32,
    max_tokens: usize,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl OpenAiProvider {
    pub fn new(
        api_key: &str,
        api_base: &str,
        settings: &InsightConfig,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            api_key: SecretString::from(api_key.to_string()),
            api_base: api_base.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            client: build_client(timeout)?,
        })
    }

    fn build_request(&self, prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: self.temperature,
            max_tokens: Some(self.max_tokens),
        }
    }
}

#[async_trait]
impl InsightTextSource for OpenAiProvider {
    async fn complete(&self, prompt: &str) -> SourceResult<String> {
        info!(
            "Generating insights with OpenAI (model: {}, temperature: {})",
            self.model, self.temperature
        );

        let start_time = Instant::now();
        let url = format!("{}/chat/completions", self.api_base);

        let request = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&self.build_request(prompt));

        let response: ChatCompletionResponse = send_json(SOURCE, request).await?;

        debug!(
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Received response from OpenAI"
        );

        extract_content(response)
    }

    fn name(&self) -> &'static str {
        SOURCE
    }
}

fn extract_content(response: ChatCompletionResponse) -> SourceResult<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| SourceError::malformed(SOURCE, "No content in OpenAI response"))
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}
