//! Relay configuration, read from the environment.

use woordspel_providers::openrouter::DEFAULT_TIMEOUT_SECS;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8787;

/// Where the relay listens and how it reaches the provider.
///
/// Note: Custom Debug impl masks the API key.
#[derive(Clone)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
    /// Provider credential; requests fail with 500 while it is unset.
    pub api_key: Option<String>,
    /// Provider base URL override.
    pub base_url: Option<String>,
    /// Model override.
    pub model: Option<String>,
    /// Upstream request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            api_key: None,
            base_url: None,
            model: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl RelayConfig {
    /// Read configuration from process environment variables.
    ///
    /// - `OPENROUTER_API_KEY`, `OPENROUTER_BASE_URL`, `OPENROUTER_MODEL`
    /// - `WOORDSPEL_RELAY_HOST` (or `HOST`), `WOORDSPEL_RELAY_PORT` (or `PORT`)
    /// - `WOORDSPEL_RELAY_TIMEOUT_SECS`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let host = non_empty("WOORDSPEL_RELAY_HOST")
            .or_else(|| non_empty("HOST"))
            .unwrap_or(defaults.host);
        let port = non_empty("WOORDSPEL_RELAY_PORT")
            .or_else(|| non_empty("PORT"))
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);
        let timeout_secs = non_empty("WOORDSPEL_RELAY_TIMEOUT_SECS")
            .and_then(|t| t.parse().ok())
            .unwrap_or(defaults.timeout_secs);

        Self {
            host,
            port,
            api_key: non_empty("OPENROUTER_API_KEY"),
            base_url: non_empty("OPENROUTER_BASE_URL"),
            model: non_empty("OPENROUTER_MODEL"),
            timeout_secs,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
