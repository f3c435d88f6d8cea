//! Error types.
//!
//! `JudgeError` covers every way the external judge can fail to produce a
//! verdict. It lives in `woordspel-core` so the verification policy can
//! classify failures without knowing which transport produced them.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when consulting the external judge.
#[derive(Debug, Error)]
pub enum JudgeError {
    /// The judge did not answer within the configured bound.
    #[error("judge timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// Authentication failed (invalid or missing API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// The API or relay returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The reply did not contain generated text where it was expected.
    #[error("malformed reply: {0}")]
    MalformedReply(String),
}

/// Errors returned by a verification.
///
/// A wrong answer is not an error; it is `Verdict::Rejected`.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The submission was empty after normalization.
    #[error("answer is empty")]
    EmptyAnswer,

    /// The judge could not be reached or gave no usable reply.
    #[error("judge unavailable: {0}")]
    JudgeUnavailable(#[source] JudgeError),
}

/// Errors returned when asking for a hint.
#[derive(Debug, Error)]
pub enum HintError {
    /// The round was already answered.
    #[error("round is already answered")]
    RoundOver,

    /// The judge could not be reached or gave no usable reply.
    #[error("judge unavailable: {0}")]
    JudgeUnavailable(#[source] JudgeError),
}

/// Errors reading or writing the durable answer cache.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to access cache file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse cache file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn judge_error_messages() {
        assert_eq!(
            JudgeError::Timeout(10).to_string(),
            "judge timed out after 10s"
        );
        assert_eq!(
            JudgeError::Api {
                status: 500,
                message: "API key not configured".into()
            }
            .to_string(),
            "API error (HTTP 500): API key not configured"
        );
    }

    #[test]
    fn verify_error_keeps_source() {
        let err = VerifyError::JudgeUnavailable(JudgeError::Network("refused".into()));
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("network error: refused"));
    }
}
