//! Configuration and judge factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use woordspel_core::Judge;

use crate::judge::OracleJudge;
use crate::openrouter::OpenRouterClient;
use crate::relay_client::RelayClient;

/// How the judge reaches the language model.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JudgeConfig {
    /// Through the relay; the credential stays on the server.
    Relay {
        #[serde(default = "default_relay_url")]
        url: String,
    },
    /// Straight to the provider with a locally held key.
    Direct {
        #[serde(default)]
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        model: Option<String>,
    },
}

impl std::fmt::Debug for JudgeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JudgeConfig::Relay { url } => f.debug_struct("Relay").field("url", url).finish(),
            JudgeConfig::Direct {
                api_key: _,
                base_url,
                model,
            } => f
                .debug_struct("Direct")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("model", model)
                .finish(),
        }
    }
}

impl Default for JudgeConfig {
    fn default() -> Self {
        JudgeConfig::Relay {
            url: default_relay_url(),
        }
    }
}

fn default_relay_url() -> String {
    "http://127.0.0.1:8787/".to_string()
}

/// Top-level woordspel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WoordspelConfig {
    /// Where accepted answers are stored.
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,
    /// Upper bound on a single judge call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// How to reach the judge.
    #[serde(default)]
    pub judge: JudgeConfig,
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("./woordspel-answers.json")
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for WoordspelConfig {
    fn default() -> Self {
        Self {
            cache_path: default_cache_path(),
            timeout_secs: default_timeout_secs(),
            judge: JudgeConfig::default(),
        }
    }
}

impl WoordspelConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn resolve_judge_config(config: &JudgeConfig) -> JudgeConfig {
    match config {
        JudgeConfig::Relay { url } => JudgeConfig::Relay {
            url: resolve_env_vars(url),
        },
        JudgeConfig::Direct {
            api_key,
            base_url,
            model,
        } => JudgeConfig::Direct {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
            model: model.as_ref().map(|m| resolve_env_vars(m)),
        },
    }
}

/// Load config from an explicit path, or search the well-known paths.
///
/// Search order without a path:
/// 1. `woordspel.toml` in the current directory
/// 2. `~/.config/woordspel/config.toml`
///
/// Environment variable overrides: `WOORDSPEL_RELAY_URL`, `OPENROUTER_API_KEY`.
pub fn load_config_from(path: Option<&Path>) -> Result<WoordspelConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("woordspel.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<WoordspelConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => WoordspelConfig::default(),
    };

    config.judge = resolve_judge_config(&config.judge);
    apply_env_overrides(&mut config);
    Ok(config)
}

fn apply_env_overrides(config: &mut WoordspelConfig) {
    match &mut config.judge {
        JudgeConfig::Relay { url } => {
            if let Ok(override_url) = std::env::var("WOORDSPEL_RELAY_URL") {
                *url = override_url;
            }
        }
        JudgeConfig::Direct { api_key, .. } => {
            if api_key.is_empty() {
                if let Ok(key) = std::env::var("OPENROUTER_API_KEY") {
                    *api_key = key;
                }
            }
        }
    }
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("woordspel"))
}

/// Create a judge from its configuration.
pub fn create_judge(config: &JudgeConfig, timeout: Duration) -> Result<Arc<dyn Judge>> {
    let timeout_secs = timeout.as_secs().max(1);
    match config {
        JudgeConfig::Relay { url } => {
            let client = RelayClient::with_timeout(url, timeout_secs)
                .context("failed to create relay client")?;
            Ok(Arc::new(OracleJudge::new(Box::new(client))))
        }
        JudgeConfig::Direct {
            api_key,
            base_url,
            model,
        } => {
            anyhow::ensure!(
                !api_key.is_empty(),
                "no API key configured for the direct judge; set `api_key` or OPENROUTER_API_KEY"
            );
            let client = OpenRouterClient::with_timeout(
                api_key,
                base_url.clone(),
                model.clone(),
                timeout_secs,
            )
            .context("failed to create provider client")?;
            Ok(Arc::new(OracleJudge::new(Box::new(client))))
        }
    }
}
