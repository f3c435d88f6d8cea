//! Core data model types for woordspel.
//!
//! Categories and letters come from fixed enumerations; answers are compared
//! and stored in their normalized form.

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Every letter a round can ask for.
pub const LETTERS: [char; 17] = [
    'A', 'B', 'D', 'F', 'G', 'H', 'K', 'L', 'W', 'V', 'T', 'S', 'R', 'P', 'O', 'N', 'M',
];

/// Every category a round can ask for, as shown to the player.
pub const CATEGORIES: [&str; 40] = [
    "Een kledingstuk",
    "Een jongensnaam",
    "Een meisjesnaam",
    "Iets dat geluid maakt",
    "Iets zoets",
    "Iets zuurs",
    "Iets rond",
    "Iets warm",
    "Iets koud",
    "Een dier",
    "Een land",
    "Een stad",
    "Een beroep",
    "Een fruit",
    "Een groente",
    "Een sport",
    "Een muziekinstrument",
    "Een vervoermiddel",
    "Een superheld",
    "Een kleur",
    "Een sprookjesfiguur",
    "Een emotie",
    "Een feestdag",
    "Een weersomstandigheid",
    "Een schoolvak",
    "Een speelgoed",
    "Een gebouw",
    "Een meubel",
    "Een lichaamsdeel",
    "Een zeedier",
    "Een insect",
    "Een bloem",
    "Een boom",
    "Een attractie",
    "Een game",
    "Een stripfiguur",
    "Een film",
    "Een boek",
    "Een restaurant",
    "Een hobby",
];

/// The kind of word a round expects (e.g. "Een dier").
///
/// Identity is the exact display string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this category is part of the fixed enumeration.
    pub fn is_known(&self) -> bool {
        CATEGORIES.contains(&self.0.as_str())
    }

    /// All categories of the fixed enumeration, in display order.
    pub fn all() -> impl Iterator<Item = Category> {
        CATEGORIES.iter().map(|c| Category::new(*c))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The required initial character of an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Letter(char);

impl Letter {
    /// Create a letter; the character is stored upper-case.
    pub fn new(c: char) -> Self {
        Self(c.to_uppercase().next().unwrap_or(c))
    }

    pub fn as_char(&self) -> char {
        self.0
    }

    /// Whether this letter is part of the fixed enumeration.
    pub fn is_known(&self) -> bool {
        LETTERS.contains(&self.0)
    }

    /// All letters of the fixed enumeration.
    pub fn all() -> impl Iterator<Item = Letter> {
        LETTERS.iter().map(|c| Letter(*c))
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a string is not exactly one character.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("a letter must be exactly one character, got '{0}'")]
pub struct ParseLetterError(String);

impl FromStr for Letter {
    type Err = ParseLetterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Letter::new(c)),
            _ => Err(ParseLetterError(s.to_string())),
        }
    }
}

/// A submission in its canonical comparison form: trimmed and lower-cased.
///
/// Normalization is idempotent, so normalizing a stored answer again is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedAnswer(String);

impl NormalizedAnswer {
    pub fn new(raw: &str) -> Self {
        Self(normalize(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonicalize a raw submission for comparison and storage.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Outcome of verifying a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected,
}

impl Verdict {
    pub fn is_accepted(self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Accepted => write!(f, "accepted"),
            Verdict::Rejected => write!(f, "rejected"),
        }
    }
}

/// The ephemeral state of a single round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    /// Identifier used to correlate log lines of one round.
    pub id: Uuid,
    /// Active category.
    pub category: Category,
    /// Active letter.
    pub letter: Letter,
    /// Whether an answer has been accepted this round.
    pub answered: bool,
    /// Whether a hint was requested this round.
    pub hint_used: bool,
}

impl RoundState {
    pub fn new(category: Category, letter: Letter) -> Self {
        Self {
            id: Uuid::new_v4(),
            category,
            letter,
            answered: false,
            hint_used: false,
        }
    }

    /// A fresh round with category and letter drawn uniformly from the enumerations.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let category = CATEGORIES
            .choose(rng)
            .map(|c| Category::new(*c))
            .unwrap_or_else(|| Category::new(CATEGORIES[0]));
        let letter = LETTERS
            .choose(rng)
            .map(|c| Letter::new(*c))
            .unwrap_or(Letter::new(LETTERS[0]));
        Self::new(category, letter)
    }

    /// The question as shown to the player.
    pub fn question(&self) -> String {
        format!("{} dat begint met de letter {}", self.category, self.letter)
    }
}
