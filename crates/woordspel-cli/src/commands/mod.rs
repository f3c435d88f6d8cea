pub mod cache;
pub mod categories;
pub mod check;
pub mod hint;
pub mod init;
pub mod play;
pub mod relay;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use woordspel_core::model::{Category, Letter};
use woordspel_core::{AnswerCache, VerificationPolicy};
use woordspel_providers::config::{create_judge, load_config_from};
use woordspel_providers::WoordspelConfig;

pub const MSG_ACCEPTED: &str = "Goed zo!";
pub const MSG_REJECTED: &str = "Helaas, dat is niet correct. Probeer het opnieuw.";
pub const MSG_EMPTY: &str = "Voer eerst een antwoord in";
pub const MSG_CHECK_FAILED: &str =
    "Er is een fout opgetreden bij het controleren van het antwoord.";
pub const MSG_HINT_FAILED: &str = "Sorry, kon geen hint ophalen.";

/// Global path overrides from the command line.
pub struct Paths {
    pub config: Option<PathBuf>,
    pub cache: Option<PathBuf>,
}

impl Paths {
    fn load_config(&self) -> Result<WoordspelConfig> {
        let mut config = load_config_from(self.config.as_deref())?;
        if let Some(cache) = &self.cache {
            config.cache_path = cache.clone();
        }
        Ok(config)
    }

    fn open_cache(&self, config: &WoordspelConfig) -> Result<AnswerCache> {
        open_cache(&config.cache_path)
    }

    /// Load config, cache and judge into a ready verification policy.
    pub fn policy(&self) -> Result<VerificationPolicy> {
        let config = self.load_config()?;
        let cache = self.open_cache(&config)?;
        let judge = create_judge(&config.judge, config.timeout())?;
        tracing::debug!(
            judge = judge.name(),
            cache = %config.cache_path.display(),
            "session ready"
        );
        Ok(VerificationPolicy::new(cache, judge).with_timeout(config.timeout()))
    }

    /// Just the cache, for commands that never reach the judge.
    pub fn cache_only(&self) -> Result<AnswerCache> {
        let config = self.load_config()?;
        self.open_cache(&config)
    }
}

fn open_cache(path: &Path) -> Result<AnswerCache> {
    AnswerCache::load(path)
        .with_context(|| format!("failed to open answer cache {}", path.display()))
}

/// Validate a category name against the fixed list.
pub fn parse_category(raw: &str) -> Result<Category> {
    let category = Category::new(raw.trim());
    anyhow::ensure!(
        category.is_known(),
        "unknown category '{raw}'; run `woordspel categories` for the list"
    );
    Ok(category)
}

/// Validate a letter against the fixed alphabet.
pub fn parse_letter(raw: char) -> Result<Letter> {
    let letter = Letter::new(raw);
    anyhow::ensure!(
        letter.is_known(),
        "letter '{raw}' is not used in the game; run `woordspel categories` for the list"
    );
    Ok(letter)
}
