//! `Judge` implementation on top of a text-completion `Oracle`.

use async_trait::async_trait;
use tracing::instrument;

use woordspel_core::model::{Category, Letter};
use woordspel_core::{Judge, JudgeError};

use crate::oracle::{Action, Oracle};
use crate::prompt::{check_prompt, hint_prompt, parse_verdict};

/// Judges answers by asking a language model in Dutch.
pub struct OracleJudge {
    oracle: Box<dyn Oracle>,
}

impl OracleJudge {
    pub fn new(oracle: Box<dyn Oracle>) -> Self {
        Self { oracle }
    }
}

#[async_trait]
impl Judge for OracleJudge {
    fn name(&self) -> &str {
        self.oracle.name()
    }

    #[instrument(skip(self), fields(oracle = self.oracle.name()))]
    async fn check(
        &self,
        word: &str,
        category: &Category,
        letter: &Letter,
    ) -> Result<bool, JudgeError> {
        let reply = self
            .oracle
            .complete(Action::CheckAnswer, &check_prompt(word, category, letter))
            .await?;
        let accepted = parse_verdict(&reply);
        tracing::debug!(accepted, "judge replied {reply:?}");
        Ok(accepted)
    }

    #[instrument(skip(self), fields(oracle = self.oracle.name()))]
    async fn hint(&self, category: &Category, letter: &Letter) -> Result<String, JudgeError> {
        let reply = self
            .oracle
            .complete(Action::GetHint, &hint_prompt(category, letter))
            .await?;
        Ok(reply.trim().to_string())
    }
}
