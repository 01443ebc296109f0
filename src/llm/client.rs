use log::debug;
use reqwest::Client;

use crate::error::{NarratorError, Result};
use crate::llm::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, NarrativeResult, TokenUsage,
};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o";

/// Generation parameters for one chat call.
#[derive(Debug, Clone, Copy)]
pub struct ChatOptions {
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl ChatOptions {
    /// Zero-randomness settings for the deterministic review-chain calls.
    pub fn deterministic() -> Self {
        Self {
            temperature: 0.0,
            max_tokens: None,
        }
    }

    /// Settings for the single-shot report summaries.
    pub fn summary() -> Self {
        Self {
            temperature: 0.2,
            max_tokens: Some(150),
        }
    }
}

/// Thin client over an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl ChatClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: OPENAI_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Points the client at a different OpenAI-compatible endpoint, e.g. a
    /// locally hosted model server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends one system + user exchange and returns the model's text along
    /// with token usage.
    pub async fn chat(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        options: ChatOptions,
    ) -> Result<NarrativeResult> {
        let url = format!("{}/chat/completions", self.base_url);
        let payload = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(system_prompt.trim()),
                ChatMessage::user(user_prompt.trim()),
            ],
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        debug!(
            "Chat request to {} (model {}, temperature {})",
            url, self.model, options.temperature
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NarratorError::NarrativeFailed(format!(
                "chat completion returned status {}: {}",
                status, body
            )));
        }

        let body: ChatCompletionResponse = response.json().await?;
        let usage = body.usage.unwrap_or(TokenUsage::default());
        let text = body
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_ref())
            .map(|content| content.trim().to_string())
            .ok_or_else(|| {
                NarratorError::NarrativeFailed("no content in chat completion".to_string())
            })?;

        Ok(NarrativeResult { text, usage })
    }
}
