//! OpenAI-compatible extractor.
//!
//! Supports OpenAI API, Azure OpenAI, and local Ollama instances.
//! Returns the raw assistant message; parsing is left to the extraction service.

use crate::domain::DomainError;
use crate::ports::Extractor;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

const SYSTEM_PROMPT: &str = "You are a helpful assistant that extracts structured information \
from customer support emails. Always respond with valid JSON only.";

/// OpenAI-compatible chat-completions client.
pub struct OpenAiExtractor {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiExtractor {
    /// Create a new OpenAI extractor.
    ///
    /// # Arguments
    /// * `api_url` - API endpoint (e.g., "https://api.openai.com/v1/chat/completions")
    /// * `api_key` - API key (can be empty for local Ollama)
    /// * `model` - Model name (e.g., "gpt-3.5-turbo", "llama3.2")
    pub fn new(api_url: String, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            model,
            temperature: 0.3,
            max_tokens: 300,
        }
    }
}

/// OpenAI API request structure.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// OpenAI API response structure.
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: Option<String>,
}

#[async_trait::async_trait]
impl Extractor for OpenAiExtractor {
    async fn extract(&self, prompt: &str) -> Result<String, DomainError> {
        info!(model = %self.model, prompt_len = prompt.len(), "sending email to AI");

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::ExtractionUnavailable(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %text, "AI API returned error");
            return Err(DomainError::ExtractionUnavailable(format!(
                "API error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            DomainError::ExtractionUnavailable(format!("Failed to parse API response: {}", e))
        })?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                DomainError::ExtractionUnavailable("No response content returned".to_string())
            })?;

        debug!(raw_len = content.len(), "received AI response");
        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn extractor(server: &MockServer) -> OpenAiExtractor {
        OpenAiExtractor::new(
            format!("{}/v1/chat/completions", server.uri()),
            "sk-test".to_string(),
            "gpt-3.5-turbo".to_string(),
        )
    }

    #[tokio::test]
    async fn test_extract_returns_trimmed_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-3.5-turbo",
                "temperature": 0.3,
                "max_tokens": 300
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "  {\"summary\":\"s\"}\n"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let raw = extractor(&server).extract("prompt").await.unwrap();

        assert_eq!(raw, "{\"summary\":\"s\"}");
    }

    #[tokio::test]
    async fn test_extract_api_error_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let err = extractor(&server).extract("prompt").await.unwrap_err();

        match err {
            DomainError::ExtractionUnavailable(msg) => assert!(msg.contains("429")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_extract_empty_choices_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let err = extractor(&server).extract("prompt").await.unwrap_err();

        assert!(matches!(err, DomainError::ExtractionUnavailable(_)));
    }
}
