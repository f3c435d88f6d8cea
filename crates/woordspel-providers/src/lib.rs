//! woordspel-providers — judge integrations.
//!
//! Implements the `Judge` trait over a language model reached either directly
//! (OpenRouter) or through the woordspel relay, plus a scripted mock.

pub mod config;
pub mod judge;
pub mod mock;
pub mod openrouter;
pub mod oracle;
pub mod prompt;
pub mod relay_client;

pub use config::{create_judge, load_config_from, JudgeConfig, WoordspelConfig};
pub use judge::OracleJudge;
pub use mock::MockJudge;
pub use openrouter::OpenRouterClient;
pub use oracle::{Action, Oracle};
pub use relay_client::RelayClient;
