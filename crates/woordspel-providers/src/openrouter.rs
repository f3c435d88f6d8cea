//! OpenRouter chat-completion client (OpenAI-compatible API).

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::instrument;

use woordspel_core::JudgeError;

use crate::oracle::{extract_content, Action, Oracle};

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api";
/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "openai/gpt-oss-20b:free";
/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Calls the provider's chat-completion endpoint with a bearer credential.
pub struct OpenRouterClient {
    api_key: String,
    base_url: String,
    model: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

/// The provider's answer, untouched.
#[derive(Debug, Clone)]
pub struct ForwardedResponse {
    pub status: u16,
    pub retry_after_secs: Option<u64>,
    pub body: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

impl OpenRouterClient {
    pub fn new(
        api_key: &str,
        base_url: Option<String>,
        model: Option<String>,
    ) -> Result<Self, JudgeError> {
        Self::with_timeout(api_key, base_url, model, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(
        api_key: &str,
        base_url: Option<String>,
        model: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, JudgeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| JudgeError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key: api_key.to_string(),
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout_secs,
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send `prompt` as a single user message and return the raw response.
    ///
    /// Only transport failures are errors; HTTP error statuses are returned
    /// as-is for the caller to interpret.
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    pub async fn forward(&self, prompt: &str) -> Result<ForwardedResponse, JudgeError> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    JudgeError::Timeout(self.timeout_secs)
                } else {
                    JudgeError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let retry_after_secs = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let body = response
            .text()
            .await
            .map_err(|e| JudgeError::Network(e.to_string()))?;

        Ok(ForwardedResponse {
            status,
            retry_after_secs,
            body,
        })
    }
}

#[async_trait]
impl Oracle for OpenRouterClient {
    fn name(&self) -> &str {
        "openrouter"
    }

    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn complete(&self, action: Action, prompt: &str) -> Result<String, JudgeError> {
        let response = self.forward(prompt).await?;

        match response.status {
            429 => {
                return Err(JudgeError::RateLimited {
                    retry_after_ms: response.retry_after_secs.unwrap_or(5) * 1000,
                })
            }
            401 => return Err(JudgeError::AuthenticationFailed(response.body)),
            status if status >= 400 => {
                return Err(JudgeError::Api {
                    status,
                    message: response.body,
                })
            }
            _ => {}
        }

        let json: serde_json::Value = serde_json::from_str(&response.body)
            .map_err(|e| JudgeError::MalformedReply(format!("failed to parse response: {e}")))?;
        extract_content(&json)
    }
}
