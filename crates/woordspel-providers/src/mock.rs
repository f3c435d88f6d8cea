//! Mock judge for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use woordspel_core::model::{normalize, Category, Letter};
use woordspel_core::{Judge, JudgeError};

/// A judge that answers from a script instead of calling a model.
///
/// Verdicts are looked up by normalized word; words not in the script get
/// the default verdict.
pub struct MockJudge {
    /// Map of normalized word → verdict.
    verdicts: HashMap<String, bool>,
    /// Verdict for words not in the map.
    default_verdict: bool,
    /// Text returned by `hint`.
    hint: String,
    /// When set, every call fails with a network error.
    unavailable: AtomicBool,
    /// Artificial latency applied before answering.
    delay: Option<Duration>,
    check_count: AtomicU32,
    hint_count: AtomicU32,
    /// Last (word, category, letter) passed to `check`.
    last_check: Mutex<Option<(String, Category, Letter)>>,
}

impl MockJudge {
    /// Create a mock with the given word → verdict mappings; unknown words are rejected.
    pub fn new(verdicts: HashMap<String, bool>) -> Self {
        Self {
            verdicts: verdicts
                .into_iter()
                .map(|(word, verdict)| (normalize(&word), verdict))
                .collect(),
            default_verdict: false,
            hint: "Denk aan iets wat je elke dag ziet.".to_string(),
            unavailable: AtomicBool::new(false),
            delay: None,
            check_count: AtomicU32::new(0),
            hint_count: AtomicU32::new(0),
            last_check: Mutex::new(None),
        }
    }

    /// A mock that accepts every word.
    pub fn accepting() -> Self {
        let mut mock = Self::new(HashMap::new());
        mock.default_verdict = true;
        mock
    }

    /// A mock that rejects every word.
    pub fn rejecting() -> Self {
        Self::new(HashMap::new())
    }

    /// A mock whose every call fails until `set_unavailable(false)`.
    pub fn unavailable() -> Self {
        let mock = Self::new(HashMap::new());
        mock.set_unavailable(true);
        mock
    }

    pub fn with_hint(mut self, hint: &str) -> Self {
        self.hint = hint.to_string();
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Toggle simulated unavailability, e.g. to model a transient outage.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::Relaxed);
    }

    /// Number of `check` calls made.
    pub fn check_count(&self) -> u32 {
        self.check_count.load(Ordering::Relaxed)
    }

    /// Number of `hint` calls made.
    pub fn hint_count(&self) -> u32 {
        self.hint_count.load(Ordering::Relaxed)
    }

    /// The last word checked, with its category and letter.
    pub fn last_check(&self) -> Option<(String, Category, Letter)> {
        self.last_check
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    async fn simulate(&self) -> Result<(), JudgeError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.unavailable.load(Ordering::Relaxed) {
            return Err(JudgeError::Network("mock judge unavailable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl Judge for MockJudge {
    fn name(&self) -> &str {
        "mock"
    }

    async fn check(
        &self,
        word: &str,
        category: &Category,
        letter: &Letter,
    ) -> Result<bool, JudgeError> {
        self.check_count.fetch_add(1, Ordering::Relaxed);
        *self
            .last_check
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) =
            Some((word.to_string(), category.clone(), *letter));

        self.simulate().await?;
        Ok(self
            .verdicts
            .get(&normalize(word))
            .copied()
            .unwrap_or(self.default_verdict))
    }

    async fn hint(&self, _category: &Category, _letter: &Letter) -> Result<String, JudgeError> {
        self.hint_count.fetch_add(1, Ordering::Relaxed);
        self.simulate().await?;
        Ok(self.hint.clone())
    }
}
