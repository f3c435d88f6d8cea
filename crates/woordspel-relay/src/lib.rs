//! woordspel-relay — keeps the provider credential on the server.
//!
//! Clients POST `{"action": "checkAnswer" | "getHint", "params": {"prompt": ...}}`
//! and receive the provider's chat-completion body unchanged.

pub mod config;
pub mod handler;
pub mod server;

pub use config::RelayConfig;
pub use handler::{Relay, RelayError, RelayResponse};
pub use server::{run, serve, serve_with, Limits, MAX_BODY_BYTES, MAX_HEAD_BYTES};
