//! Client for the woordspel relay, which holds the provider credential.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::instrument;

use woordspel_core::JudgeError;

use crate::oracle::{extract_content, Action, Oracle};
use crate::openrouter::DEFAULT_TIMEOUT_SECS;

/// Sends prompts to the relay endpoint; never sees the provider key.
pub struct RelayClient {
    url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct RelayRequest<'a> {
    action: Action,
    params: RelayParams<'a>,
}

#[derive(Serialize)]
struct RelayParams<'a> {
    prompt: &'a str,
}

impl RelayClient {
    pub fn new(url: &str) -> Result<Self, JudgeError> {
        Self::with_timeout(url, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(url: &str, timeout_secs: u64) -> Result<Self, JudgeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| JudgeError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            url: url.to_string(),
            timeout_secs,
            client,
        })
    }
}

#[async_trait]
impl Oracle for RelayClient {
    fn name(&self) -> &str {
        "relay"
    }

    #[instrument(skip(self, prompt), fields(url = %self.url))]
    async fn complete(&self, action: Action, prompt: &str) -> Result<String, JudgeError> {
        let request = RelayRequest {
            action,
            params: RelayParams { prompt },
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
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
        let body = response
            .text()
            .await
            .map_err(|e| JudgeError::Network(e.to_string()))?;

        if status != 200 {
            // The relay reports failures as `{ "error": message }`.
            let parsed = serde_json::from_str::<serde_json::Value>(&body).ok();
            let message = parsed
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
                .unwrap_or(body);
            return Err(JudgeError::Api { status, message });
        }

        let json: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| JudgeError::MalformedReply(format!("failed to parse response: {e}")))?;
        extract_content(&json)
    }
}
