//! Prompt construction and reply interpretation.
//!
//! This is the only place that reads meaning into the oracle's free text.

use woordspel_core::model::{Category, Letter};

/// The token a positive judgment must start with.
pub const AFFIRMATIVE: &str = "ja";

/// Prompt asking whether `word` fits the category and letter.
pub fn check_prompt(word: &str, category: &Category, letter: &Letter) -> String {
    format!(
        "Klopt het woord '{word}' met de gegeven letter en categorie? \
         {category} dat begint met de letter {letter}. \
         Het moet een nederlands woord zijn. Beantwoord met ja of nee"
    )
}

/// Prompt asking for a hint that does not reveal an answer.
pub fn hint_prompt(category: &Category, letter: &Letter) -> String {
    format!(
        "Geef een hint voor {category} dat begint met de letter {letter}. \
         Maak het niet te makkelijk, geef geen direct antwoord."
    )
}

/// Interpret a judgment reply: `true` only if its first word is the affirmative token.
///
/// Anything else, including an empty reply or a word that merely starts with
/// the same letters ("jammer"), is a rejection.
pub fn parse_verdict(reply: &str) -> bool {
    let reply = reply.trim().to_lowercase();
    let first_word: String = reply.chars().take_while(|c| c.is_alphabetic()).collect();
    first_word == AFFIRMATIVE
}
