//! Answer verification.
//!
//! The local cache is always consulted first; only a miss reaches the
//! external judge, and an accepted judgment is written through to the cache
//! so the same answer never costs a second call.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::AnswerCache;
use crate::error::{JudgeError, VerifyError};
use crate::model::{Category, Letter, NormalizedAnswer, Verdict};
use crate::traits::Judge;

/// Upper bound on a single judge call.
pub const DEFAULT_JUDGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Decides whether a submitted word is acceptable for a round.
///
/// Holds the cache exclusively, so the check-then-insert sequence of a
/// verification cannot interleave with another one.
pub struct VerificationPolicy {
    cache: AnswerCache,
    judge: Arc<dyn Judge>,
    timeout: Duration,
}

impl VerificationPolicy {
    pub fn new(cache: AnswerCache, judge: Arc<dyn Judge>) -> Self {
        Self {
            cache,
            judge,
            timeout: DEFAULT_JUDGE_TIMEOUT,
        }
    }

    /// Set the bound on each judge call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn cache(&self) -> &AnswerCache {
        &self.cache
    }

    /// Verify `word` for (`category`, `letter`).
    ///
    /// If the returned future is dropped while the judge is consulted, the
    /// cache is left untouched.
    #[tracing::instrument(
        skip(self, category, letter),
        fields(%category, %letter, judge = self.judge.name())
    )]
    pub async fn verify(
        &mut self,
        word: &str,
        category: &Category,
        letter: &Letter,
    ) -> Result<Verdict, VerifyError> {
        let answer = NormalizedAnswer::new(word);
        if answer.is_empty() {
            return Err(VerifyError::EmptyAnswer);
        }

        if self.cache.contains(category, letter, answer.as_str()) {
            tracing::debug!("answer found in cache");
            return Ok(Verdict::Accepted);
        }

        let accepted = bounded(self.timeout, self.judge.check(word.trim(), category, letter))
            .await
            .map_err(|e| {
                tracing::warn!("judge unavailable for '{answer}': {e}");
                VerifyError::JudgeUnavailable(e)
            })?;

        if !accepted {
            tracing::debug!("judge rejected the answer");
            return Ok(Verdict::Rejected);
        }

        if self.cache.insert(category, letter, answer.as_str()) {
            tracing::info!("learned new answer '{answer}'");
        }
        Ok(Verdict::Accepted)
    }

    /// Ask the judge for an example answer, bounded like `verify`.
    #[tracing::instrument(skip(self, category, letter), fields(%category, %letter))]
    pub async fn hint(&self, category: &Category, letter: &Letter) -> Result<String, JudgeError> {
        let hint = bounded(self.timeout, self.judge.hint(category, letter)).await?;
        Ok(hint.trim().to_string())
    }
}

/// Run a judge call, mapping an elapsed `timeout` to `JudgeError::Timeout`.
async fn bounded<T, F>(timeout: Duration, call: F) -> Result<T, JudgeError>
where
    F: Future<Output = Result<T, JudgeError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(JudgeError::Timeout(timeout.as_secs())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedJudge;

    fn dier() -> Category {
        Category::new("Een dier")
    }

    fn h() -> Letter {
        Letter::new('H')
    }

    fn policy_with(judge: &Arc<ScriptedJudge>) -> VerificationPolicy {
        VerificationPolicy::new(AnswerCache::in_memory(), judge.clone())
    }

    #[tokio::test]
    async fn empty_submission_is_a_validation_error() {
        let judge = Arc::new(ScriptedJudge::accepting(&["hond"]));
        let mut policy = policy_with(&judge);

        let err = policy.verify("  \t", &dier(), &h()).await.unwrap_err();
        assert!(matches!(err, VerifyError::EmptyAnswer));
        assert_eq!(judge.checks(), 0);
        assert!(policy.cache().is_empty());
    }

    #[tokio::test]
    async fn cache_hit_skips_the_judge() {
        let judge = Arc::new(ScriptedJudge::accepting(&[]));
        let mut cache = AnswerCache::in_memory();
        assert!(cache.insert(&dier(), &h(), "hond"));
        let mut policy = VerificationPolicy::new(cache, judge.clone());

        let verdict = policy.verify("Hond ", &dier(), &h()).await.unwrap();
        assert_eq!(verdict, Verdict::Accepted);
        assert_eq!(judge.checks(), 0);
    }

    #[tokio::test]
    async fn accepted_judgment_is_written_through() {
        let judge = Arc::new(ScriptedJudge::accepting(&["haas"]));
        let mut policy = policy_with(&judge);

        let verdict = policy.verify("Haas", &dier(), &h()).await.unwrap();
        assert_eq!(verdict, Verdict::Accepted);
        assert!(policy.cache().contains(&dier(), &h(), "haas"));
        assert_eq!(judge.checks(), 1);
    }

    #[tokio::test]
    async fn rejection_leaves_cache_unchanged() {
        let judge = Arc::new(ScriptedJudge::accepting(&["hond"]));
        let mut policy = policy_with(&judge);
        let before = policy.cache().document().clone();

        let verdict = policy.verify("kat", &dier(), &h()).await.unwrap();
        assert_eq!(verdict, Verdict::Rejected);
        assert_eq!(policy.cache().document(), &before);
    }

    #[tokio::test]
    async fn rejected_answers_are_asked_again() {
        let judge = Arc::new(ScriptedJudge::accepting(&[]));
        let mut policy = policy_with(&judge);

        policy.verify("kat", &dier(), &h()).await.unwrap();
        policy.verify("kat", &dier(), &h()).await.unwrap();
        assert_eq!(judge.checks(), 2);
    }

    #[tokio::test]
    async fn transient_failure_is_isolated() {
        let judge = Arc::new(ScriptedJudge::accepting(&["hond"]));
        let mut policy = policy_with(&judge);

        judge.set_unavailable(true);
        let err = policy.verify("hond", &dier(), &h()).await.unwrap_err();
        assert!(matches!(
            err,
            VerifyError::JudgeUnavailable(JudgeError::Network(_))
        ));
        assert!(policy.cache().is_empty());

        judge.set_unavailable(false);
        let verdict = policy.verify("hond", &dier(), &h()).await.unwrap();
        assert_eq!(verdict, Verdict::Accepted);
        assert!(policy.cache().contains(&dier(), &h(), "hond"));
        assert_eq!(judge.checks(), 2);
    }

    #[tokio::test]
    async fn unknown_pair_behaves_as_empty() {
        let judge = Arc::new(ScriptedJudge::accepting(&[]));
        let mut policy = policy_with(&judge);

        let verdict = policy
            .verify("mars", &Category::new("Een planeet"), &Letter::new('Q'))
            .await
            .unwrap();
        assert_eq!(verdict, Verdict::Rejected);
        assert_eq!(judge.checks(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_judge_times_out() {
        let judge =
            Arc::new(ScriptedJudge::accepting(&["hond"]).with_delay(Duration::from_secs(60)));
        let mut policy = policy_with(&judge).with_timeout(Duration::from_secs(10));

        let err = policy.verify("hond", &dier(), &h()).await.unwrap_err();
        assert!(matches!(
            err,
            VerifyError::JudgeUnavailable(JudgeError::Timeout(10))
        ));
        assert!(policy.cache().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_verification_does_not_write() {
        let judge =
            Arc::new(ScriptedJudge::accepting(&["hond"]).with_delay(Duration::from_secs(5)));
        let mut policy = policy_with(&judge);

        let abandoned =
            tokio::time::timeout(Duration::from_secs(1), policy.verify("hond", &dier(), &h()))
                .await;
        assert!(abandoned.is_err());
        assert_eq!(judge.checks(), 1);
        assert!(!policy.cache().contains(&dier(), &h(), "hond"));
    }

    #[tokio::test]
    async fn learns_then_answers_from_cache() {
        let judge = Arc::new(ScriptedJudge::accepting(&["hond"]));
        let mut policy = policy_with(&judge);

        assert_eq!(
            policy.verify("hond", &dier(), &h()).await.unwrap(),
            Verdict::Accepted
        );
        assert_eq!(judge.checks(), 1);

        assert_eq!(
            policy.verify("HOND", &dier(), &h()).await.unwrap(),
            Verdict::Accepted
        );
        assert_eq!(judge.checks(), 1);
    }

    #[tokio::test]
    async fn hint_is_trimmed_and_never_cached() {
        let judge = Arc::new(ScriptedJudge::accepting(&[]));
        let policy = policy_with(&judge);

        let hint = policy.hint(&dier(), &h()).await.unwrap();
        assert_eq!(hint, "Een dier, denk aan de H");
        assert_eq!(judge.hints(), 1);
        assert!(policy.cache().is_empty());
    }
}
