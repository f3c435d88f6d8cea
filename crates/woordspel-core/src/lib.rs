//! woordspel-core — answer cache, verification policy and round model.
//!
//! This crate defines the data model, the `Judge` trait and the policy that
//! combines a learning local cache with a fallback external judge.

pub mod cache;
pub mod error;
pub mod game;
pub mod model;
pub mod policy;
pub mod traits;

#[cfg(test)]
mod test_support;

pub use cache::AnswerCache;
pub use error::{CacheError, HintError, JudgeError, VerifyError};
pub use game::Game;
pub use model::{Category, Letter, NormalizedAnswer, RoundState, Verdict};
pub use policy::VerificationPolicy;
pub use traits::Judge;
