//! Core trait definitions.
//!
//! The external judge is implemented by the `woordspel-providers` crate.

use async_trait::async_trait;

use crate::error::JudgeError;
use crate::model::{Category, Letter};

/// A remote arbiter of answer correctness and source of hints.
///
/// Implementations make a single attempt per call; retries and timeouts are
/// the caller's concern.
#[async_trait]
pub trait Judge: Send + Sync {
    /// Human-readable judge name (e.g. "relay").
    fn name(&self) -> &str;

    /// Judge whether `word` is a valid answer for `category` starting with `letter`.
    ///
    /// A reply that cannot be interpreted is an error, not `false`.
    async fn check(&self, word: &str, category: &Category, letter: &Letter)
        -> Result<bool, JudgeError>;

    /// Ask for a hint that does not give the answer away.
    async fn hint(&self, category: &Category, letter: &Letter) -> Result<String, JudgeError>;
}
