//! Scripted judge for unit tests in this crate.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::JudgeError;
use crate::model::{normalize, Category, Letter};
use crate::traits::Judge;

pub(crate) struct ScriptedJudge {
    accepted: HashSet<String>,
    unavailable: AtomicBool,
    delay: Option<Duration>,
    checks: AtomicU32,
    hints: AtomicU32,
}

impl ScriptedJudge {
    pub(crate) fn accepting(words: &[&str]) -> Self {
        Self {
            accepted: words.iter().map(|w| normalize(w)).collect(),
            unavailable: AtomicBool::new(false),
            delay: None,
            checks: AtomicU32::new(0),
            hints: AtomicU32::new(0),
        }
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub(crate) fn checks(&self) -> u32 {
        self.checks.load(Ordering::SeqCst)
    }

    pub(crate) fn hints(&self) -> u32 {
        self.hints.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Judge for ScriptedJudge {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn check(&self, word: &str, _: &Category, _: &Letter) -> Result<bool, JudgeError> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(JudgeError::Network("connection refused".into()));
        }
        Ok(self.accepted.contains(&normalize(word)))
    }

    async fn hint(&self, category: &Category, letter: &Letter) -> Result<String, JudgeError> {
        self.hints.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(JudgeError::Network("connection refused".into()));
        }
        Ok(format!("  {category}, denk aan de {letter}  \n"))
    }
}
