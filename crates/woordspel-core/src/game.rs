//! Round lifecycle: draw a question, accept submissions, hand out hints.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{HintError, VerifyError};
use crate::model::{RoundState, Verdict};
use crate::policy::VerificationPolicy;

/// A single-player session: one active round at a time.
pub struct Game {
    policy: VerificationPolicy,
    round: RoundState,
    rng: StdRng,
}

impl Game {
    /// Start a session with an entropy-seeded RNG.
    pub fn new(policy: VerificationPolicy) -> Self {
        Self::with_rng(policy, StdRng::from_entropy())
    }

    /// Start a session with a given RNG, for reproducible rounds.
    pub fn with_rng(policy: VerificationPolicy, mut rng: StdRng) -> Self {
        let round = RoundState::random(&mut rng);
        tracing::debug!(round = %round.id, question = %round.question(), "round started");
        Self { policy, round, rng }
    }

    /// Replace the current round with a freshly drawn one.
    pub fn start_round(&mut self) -> &RoundState {
        self.round = RoundState::random(&mut self.rng);
        tracing::debug!(round = %self.round.id, question = %self.round.question(), "round started");
        &self.round
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn policy(&self) -> &VerificationPolicy {
        &self.policy
    }

    /// Submit an answer for the current round.
    pub async fn submit(&mut self, word: &str) -> Result<Verdict, VerifyError> {
        let verdict = self
            .policy
            .verify(word, &self.round.category, &self.round.letter)
            .await?;
        if verdict.is_accepted() {
            self.round.answered = true;
        }
        Ok(verdict)
    }

    /// Ask the judge for a hint. Marks the hint as used even if the judge fails.
    pub async fn request_hint(&mut self) -> Result<String, HintError> {
        if self.round.answered {
            return Err(HintError::RoundOver);
        }
        self.round.hint_used = true;

        self.policy
            .hint(&self.round.category, &self.round.letter)
            .await
            .map_err(|e| {
                tracing::warn!(round = %self.round.id, "could not fetch hint: {e}");
                HintError::JudgeUnavailable(e)
            })
    }
}
