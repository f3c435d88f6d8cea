//! Relay request handling, independent of the HTTP transport.
//!
//! Checks run in a fixed order: method, body, credential, action, prompt.
//! Only a fully valid request reaches the provider.

use serde::Deserialize;
use thiserror::Error;

use woordspel_core::JudgeError;
use woordspel_providers::{Action, OpenRouterClient};

use crate::config::RelayConfig;

const JSON_MIME: &str = "application/json";
const TEXT_MIME: &str = "text/plain; charset=utf-8";

/// Why a relay request failed.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Bad Request")]
    BadRequest,

    #[error("Request Timeout")]
    RequestTimeout,

    #[error("Length Required")]
    LengthRequired,

    #[error("Payload Too Large")]
    PayloadTooLarge,

    #[error("Request Header Fields Too Large")]
    HeaderTooLarge,

    #[error("{0}")]
    MalformedRequest(String),

    #[error("API key not configured")]
    MissingCredential,

    #[error("Invalid action")]
    InvalidAction,

    #[error("{0}")]
    Upstream(#[from] JudgeError),
}

impl RelayError {
    pub fn status(&self) -> u16 {
        match self {
            RelayError::MethodNotAllowed => 405,
            RelayError::BadRequest | RelayError::InvalidAction => 400,
            RelayError::RequestTimeout => 408,
            RelayError::LengthRequired => 411,
            RelayError::PayloadTooLarge => 413,
            RelayError::HeaderTooLarge => 431,
            RelayError::MalformedRequest(_)
            | RelayError::MissingCredential
            | RelayError::Upstream(_) => 500,
        }
    }
}

/// A response ready to be written by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
    /// Whether to send `Access-Control-Allow-Origin: *`.
    pub allow_any_origin: bool,
}

impl RelayResponse {
    fn forwarded(body: String) -> Self {
        Self {
            status: 200,
            content_type: JSON_MIME,
            body,
            allow_any_origin: true,
        }
    }

    pub fn from_error(err: &RelayError) -> Self {
        match err {
            RelayError::MethodNotAllowed => Self {
                status: err.status(),
                content_type: TEXT_MIME,
                body: err.to_string(),
                allow_any_origin: false,
            },
            _ => Self {
                status: err.status(),
                content_type: JSON_MIME,
                body: serde_json::json!({ "error": err.to_string() }).to_string(),
                allow_any_origin: false,
            },
        }
    }

    /// Serialize as an HTTP/1.1 response that closes the connection.
    pub fn to_http(&self) -> Vec<u8> {
        let mut head = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\n",
            self.status,
            reason_phrase(self.status),
            self.content_type,
            self.body.len()
        );
        if self.allow_any_origin {
            head.push_str("Access-Control-Allow-Origin: *\r\n");
        }
        head.push_str("Connection: close\r\n\r\n");

        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(self.body.as_bytes());
        bytes
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        405 => "Method Not Allowed",
        408 => "Request Timeout",
        411 => "Length Required",
        413 => "Payload Too Large",
        431 => "Request Header Fields Too Large",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

#[derive(Debug, Deserialize)]
struct RelayRequest {
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    params: Option<RelayParams>,
}

#[derive(Debug, Deserialize)]
struct RelayParams {
    #[serde(default)]
    prompt: Option<String>,
}

/// Forwards judge and hint prompts to the provider with the server-held key.
pub struct Relay {
    upstream: Option<OpenRouterClient>,
}

impl Relay {
    pub fn new(config: &RelayConfig) -> anyhow::Result<Self> {
        let upstream = match &config.api_key {
            Some(key) => Some(OpenRouterClient::with_timeout(
                key,
                config.base_url.clone(),
                config.model.clone(),
                config.timeout_secs,
            )?),
            None => {
                tracing::warn!("OPENROUTER_API_KEY is not set; every request will fail");
                None
            }
        };
        Ok(Self { upstream })
    }

    /// Handle one request. Never fails: every error becomes a response.
    pub async fn handle(&self, method: &str, body: &str) -> RelayResponse {
        match self.dispatch(method, body).await {
            Ok(forwarded) => RelayResponse::forwarded(forwarded),
            Err(e) => {
                tracing::warn!(status = e.status(), "relay request failed: {e}");
                RelayResponse::from_error(&e)
            }
        }
    }

    async fn dispatch(&self, method: &str, body: &str) -> Result<String, RelayError> {
        if method != "POST" {
            return Err(RelayError::MethodNotAllowed);
        }

        let request: RelayRequest = serde_json::from_str(body)
            .map_err(|e| RelayError::MalformedRequest(format!("invalid request body: {e}")))?;

        let upstream = self
            .upstream
            .as_ref()
            .ok_or(RelayError::MissingCredential)?;

        let action: Action = request
            .action
            .as_deref()
            .and_then(|a| a.parse().ok())
            .ok_or(RelayError::InvalidAction)?;

        let prompt = request
            .params
            .and_then(|p| p.prompt)
            .ok_or_else(|| RelayError::MalformedRequest("missing params.prompt".to_string()))?;

        tracing::info!(%action, "forwarding prompt to provider");
        let forwarded = upstream.forward(&prompt).await?;

        serde_json::from_str::<serde_json::Value>(&forwarded.body).map_err(|e| {
            JudgeError::MalformedReply(format!(
                "provider returned non-JSON body (HTTP {}): {e}",
                forwarded.status
            ))
        })?;
        if forwarded.status >= 400 {
            tracing::warn!(status = forwarded.status, "provider returned an error, relaying it");
        }
        Ok(forwarded.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn relay_for(server: &MockServer) -> Relay {
        Relay::new(&RelayConfig {
            api_key: Some("sk-server".into()),
            base_url: Some(server.uri()),
            ..RelayConfig::default()
        })
        .unwrap()
    }

    fn keyless_relay() -> Relay {
        Relay::new(&RelayConfig::default()).unwrap()
    }

    fn error_message(response: &RelayResponse) -> String {
        let json: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        json["error"].as_str().unwrap().to_string()
    }

    const CHECK_BODY: &str = r#"{"action":"checkAnswer","params":{"prompt":"Is hond een dier?"}}"#;

    #[tokio::test]
    async fn non_post_is_rejected() {
        let response = keyless_relay().handle("GET", "").await;
        assert_eq!(response.status, 405);
        assert_eq!(response.body, "Method Not Allowed");
    }

    #[tokio::test]
    async fn missing_credential() {
        let response = keyless_relay().handle("POST", CHECK_BODY).await;
        assert_eq!(response.status, 500);
        assert_eq!(error_message(&response), "API key not configured");
        assert!(!response.allow_any_origin);
    }

    #[tokio::test]
    async fn credential_is_checked_before_action() {
        let response = keyless_relay()
            .handle("POST", r#"{"action":"dropTables","params":{"prompt":"x"}}"#)
            .await;
        assert_eq!(response.status, 500);
    }

    #[tokio::test]
    async fn unknown_or_missing_action() {
        let server = MockServer::start().await;
        let relay = relay_for(&server);

        for body in [r#"{"action":"dropTables","params":{"prompt":"x"}}"#, r#"{"params":{}}"#] {
            let response = relay.handle("POST", body).await;
            assert_eq!(response.status, 400);
            assert_eq!(error_message(&response), "Invalid action");
        }
    }

    #[tokio::test]
    async fn malformed_body_is_server_error() {
        let response = keyless_relay().handle("POST", "not json").await;
        assert_eq!(response.status, 500);
        assert!(error_message(&response).starts_with("invalid request body"));
    }

    #[tokio::test]
    async fn missing_prompt_is_server_error() {
        let server = MockServer::start().await;
        let response = relay_for(&server)
            .handle("POST", r#"{"action":"getHint"}"#)
            .await;
        assert_eq!(response.status, 500);
        assert_eq!(error_message(&response), "missing params.prompt");
    }

    #[tokio::test]
    async fn forwards_prompt_and_returns_body_verbatim() {
        let server = MockServer::start().await;
        let provider_body =
            r#"{"id":"gen-1","choices":[{"message":{"role":"assistant","content":"Ja"}}]}"#;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer sk-server"))
            .and(body_partial_json(serde_json::json!({
                "messages": [{"role": "user", "content": "Is hond een dier?"}]
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(provider_body, "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let response = relay_for(&server).handle("POST", CHECK_BODY).await;
        assert_eq!(response.status, 200);
        assert_eq!(response.body, provider_body);
        assert!(response.allow_any_origin);
    }

    #[tokio::test]
    async fn provider_error_json_is_relayed() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": {"message": "Rate limit exceeded", "code": 429}
            })))
            .mount(&server)
            .await;

        let response = relay_for(&server).handle("POST", CHECK_BODY).await;
        assert_eq!(response.status, 200);
        assert!(response.body.contains("Rate limit exceeded"));
    }

    #[tokio::test]
    async fn provider_non_json_is_server_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let response = relay_for(&server).handle("POST", CHECK_BODY).await;
        assert_eq!(response.status, 500);
        assert!(error_message(&response).contains("non-JSON"));
    }

    #[test]
    fn http_serialization() {
        let response = RelayResponse::forwarded("{}".to_string());
        let text = String::from_utf8(response.to_http()).unwrap();
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Length: 2\r\n"));
        assert!(text.contains("Access-Control-Allow-Origin: *\r\n"));
        assert!(text.ends_with("\r\n\r\n{}"));

        let error = RelayResponse::from_error(&RelayError::InvalidAction);
        let text = String::from_utf8(error.to_http()).unwrap();
        assert!(text.starts_with("HTTP/1.1 400 Bad Request\r\n"));
        assert!(!text.contains("Access-Control-Allow-Origin"));
    }
}
