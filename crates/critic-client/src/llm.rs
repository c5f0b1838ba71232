use std::time::Duration;

use critic_core::error::AppError;
use critic_core::traits::Summarizer;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Gemini's OpenAI-compatible endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_LLM_TIMEOUT: Duration = Duration::from_secs(120);
const DEFAULT_PROMPT_PREFIX: &str = "Analyze these movie reviews and provide key insights: ";

/// OpenAI-compatible chat client that summarizes review text.
///
/// Works with any OpenAI-compatible API, including:
/// - Gemini via compatibility layer (default)
/// - OpenAI directly (`https://api.openai.com/v1`)
#[derive(Clone)]
pub struct OpenAiSummarizer {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout_secs: u64,
    prompt_prefix: String,
}

impl OpenAiSummarizer {
    pub fn new(api_key: &str, model: &str) -> Result<Self, AppError> {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: &str, model: &str, base_url: &str) -> Result<Self, AppError> {
        Self::build(api_key, model, base_url, DEFAULT_LLM_TIMEOUT)
    }

    pub fn with_timeout(self, timeout: Duration) -> Result<Self, AppError> {
        let prompt_prefix = self.prompt_prefix.clone();
        let rebuilt = Self::build(&self.api_key, &self.model, &self.base_url, timeout)?;
        Ok(rebuilt.with_prompt_prefix(prompt_prefix))
    }

    /// Replace the instruction placed before the review text.
    pub fn with_prompt_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prompt_prefix = prefix.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build(
        api_key: &str,
        model: &str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Generic(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            timeout_secs: timeout.as_secs(),
            prompt_prefix: DEFAULT_PROMPT_PREFIX.to_string(),
        })
    }
}

// ---- OpenAI API types ----

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, AppError> {
        if text.trim().is_empty() {
            return Err(AppError::InvalidRequest(
                "No review text to analyze".to_string(),
            ));
        }

        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: format!("{}{}", self.prompt_prefix, text),
            }],
        };

        tracing::info!(model = %self.model, chars = text.len(), "Requesting review analysis");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Timeout(self.timeout_secs)
                } else {
                    AppError::LlmError {
                        message: e.to_string(),
                        status_code: 0,
                        retryable: e.is_connect(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            if status_code == 429 {
                return Err(AppError::RateLimitExceeded);
            }

            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("HTTP {status_code}: {body}"));

            return Err(AppError::LlmError {
                message,
                status_code,
                retryable: status_code >= 500,
            });
        }

        let chat_response: ChatResponse =
            response.json().await.map_err(|e| AppError::LlmError {
                message: format!("Failed to parse LLM response: {e}"),
                status_code: status.as_u16(),
                retryable: false,
            })?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| AppError::LlmError {
                message: "Empty response from LLM".into(),
                status_code: status.as_u16(),
                retryable: false,
            })
    }
}
