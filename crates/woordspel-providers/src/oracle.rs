//! Transport seam between the judge and the text-completion service.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use woordspel_core::JudgeError;

/// Why a prompt is being sent. The relay only forwards known actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    CheckAnswer,
    GetHint,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::CheckAnswer => "checkAnswer",
            Action::GetHint => "getHint",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "checkAnswer" => Ok(Action::CheckAnswer),
            "getHint" => Ok(Action::GetHint),
            other => Err(format!("unknown action: {other}")),
        }
    }
}

/// A remote text-completion service, reached directly or through the relay.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Transport name (e.g. "openrouter").
    fn name(&self) -> &str;

    /// Send a single prompt and return the generated text. One attempt only.
    async fn complete(&self, action: Action, prompt: &str) -> Result<String, JudgeError>;
}

/// Pull `choices[0].message.content` out of a chat-completion response body.
pub fn extract_content(body: &serde_json::Value) -> Result<String, JudgeError> {
    body.pointer("/choices/0/message/content")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            let detail = body
                .pointer("/error/message")
                .or_else(|| body.get("error"))
                .map(|e| e.to_string())
                .unwrap_or_else(|| "missing choices[0].message.content".to_string());
            JudgeError::MalformedReply(detail)
        })
}
