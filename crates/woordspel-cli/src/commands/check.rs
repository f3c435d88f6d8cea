//! The `woordspel check` command.

use anyhow::{Context, Result};

use woordspel_core::model::Verdict;
use woordspel_core::VerifyError;

use super::{
    parse_category, parse_letter, Paths, MSG_ACCEPTED, MSG_CHECK_FAILED, MSG_EMPTY, MSG_REJECTED,
};

pub async fn execute(paths: &Paths, category: String, letter: char, word: String) -> Result<()> {
    let category = parse_category(&category)?;
    let letter = parse_letter(letter)?;
    let mut policy = paths.policy()?;

    match policy.verify(&word, &category, &letter).await {
        Ok(Verdict::Accepted) => println!("{MSG_ACCEPTED}"),
        Ok(Verdict::Rejected) => println!("{MSG_REJECTED}"),
        Err(VerifyError::EmptyAnswer) => anyhow::bail!(MSG_EMPTY),
        Err(e) => return Err(e).context(MSG_CHECK_FAILED),
    }
    Ok(())
}
