//! Perplexity chat-completions client.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::AiConfig;
use crate::error::{AiError, Result};

use super::AnswerProvider;

/// Client for the Perplexity completion API.
pub struct PerplexityClient {
    client: Client,
    base_url: String,
    model: String,
    /// Resolved at construction but only required at call time: a missing
    /// key makes every request fail, it does not prevent startup.
    api_key: Option<String>,
    temperature: f32,
    top_p: f32,
    search_recency_filter: String,
}

/// Chat completion request format.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    top_p: f32,
    return_images: bool,
    return_related_questions: bool,
    search_recency_filter: &'a str,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat completion response format.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

/// Upstream error response format.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl PerplexityClient {
    /// Create a client from configuration. The API key falls back to the
    /// `PERPLEXITY_API_KEY` environment variable.
    pub fn from_config(config: &AiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("PERPLEXITY_API_KEY").ok());

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AiError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            temperature: config.temperature,
            top_p: config.top_p,
            search_recency_filter: config.search_recency_filter.clone(),
        })
    }

    async fn request_completion(&self, system_prompt: &str, question: &str) -> Result<String> {
        let api_key = self.api_key.as_ref().ok_or(AiError::MissingApiKey)?;

        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: question,
                },
            ],
            temperature: self.temperature,
            top_p: self.top_p,
            return_images: false,
            return_related_questions: false,
            search_recency_filter: &self.search_recency_filter,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AiError::Request("Request timed out".to_string())
                } else if e.is_connect() {
                    AiError::Request(format!("Connection failed: {}", e))
                } else {
                    AiError::Request(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();

        if status.is_success() {
            let result: ChatResponse = response
                .json()
                .await
                .map_err(|e| AiError::Request(format!("Failed to parse response: {}", e)))?;

            match result.choices.into_iter().next().and_then(|c| c.message.content) {
                Some(content) if !content.is_empty() => Ok(content),
                _ => Err(AiError::MissingAnswer.into()),
            }
        } else if status.as_u16() == 429 {
            Err(AiError::RateLimited.into())
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&error_text) {
                Err(AiError::Api(status.as_u16(), error_response.error.message).into())
            } else {
                Err(AiError::Api(status.as_u16(), error_text).into())
            }
        }
    }
}

#[async_trait]
impl AnswerProvider for PerplexityClient {
    async fn answer(&self, system_prompt: &str, question: &str) -> Result<String> {
        self.request_completion(system_prompt, question).await
    }
}
