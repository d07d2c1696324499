use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::llm::CompletionModel;
use crate::types::ModelConfig;

// Callers impose the LLM timeout externally; expiry surfaces as a request
// error and feeds the engine's fallback transition.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

pub struct OpenAIClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum OpenAIError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("completion response contained no content")]
    NoContent,
}

impl OpenAIClient {
    const SYSTEM_PROMPT: &str = include_str!("./prompts/summarize_0.txt");

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub async fn send_completion_request(
        &self,
        config: &ModelConfig,
        user_content: impl Into<String>,
    ) -> Result<CompletionResponse, OpenAIError> {
        let body = serde_json::json!({
            "model": config.model_name,
            "temperature": config.temperature,
            "messages": [
                {
                    "role": "system",
                    "content": Self::SYSTEM_PROMPT
                },
                {
                    "role": "user",
                    "content": user_content.into()
                }
            ]
        });

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(OpenAIError::Api { status, message });
        }

        Ok(resp.json::<CompletionResponse>().await?)
    }
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub index: u32,
    pub message: CompletionMessage,
    pub finish_reason: String,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    pub role: String,
    pub content: Option<String>,
}

impl CompletionModel for OpenAIClient {
    type Error = OpenAIError;

    async fn complete(&self, prompt: &str, config: &ModelConfig) -> Result<String, Self::Error> {
        let response = self
            .send_completion_request(config, prompt)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Completion request failed"))?;

        response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or(OpenAIError::NoContent)
    }
}
