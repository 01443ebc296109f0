//! Wire types for the OpenAI-compatible chat completion endpoint.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Token accounting returned by the API, used for cost attribution in the
/// summary reports.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    /// Rough cost estimate at gpt-4o list pricing (USD per 1k tokens).
    pub fn estimated_cost(&self) -> f64 {
        let cost = self.prompt_tokens as f64 / 1000.0 * 0.005
            + self.completion_tokens as f64 / 1000.0 * 0.015;
        (cost * 10_000.0).round() / 10_000.0
    }
}

/// Free-text model output plus its token accounting.
#[derive(Debug, Clone)]
pub struct NarrativeResult {
    pub text: String,
    pub usage: TokenUsage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cost_estimate_rounds_to_four_decimals() {
        let usage = TokenUsage {
            prompt_tokens: 1000,
            completion_tokens: 150,
            total_tokens: 1150,
        };
        assert_relative_eq!(usage.estimated_cost(), 0.0073, max_relative = 1e-9);
    }

    #[test]
    fn test_request_omits_absent_max_tokens() {
        let request = ChatCompletionRequest {
            model: "gpt-4o".to_string(),
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("hi")],
            temperature: 0.0,
            max_tokens: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("max_tokens"));
    }

    #[test]
    fn test_response_parses_without_usage() {
        let json = r#"{"choices":[{"message":{"content":"All lines up."}}]}"#;
        let response: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            response.choices[0].message.content.as_deref(),
            Some("All lines up.")
        );
        assert!(response.usage.is_none());
    }
}
