//! The `woordspel hint` command.

use anyhow::{Context, Result};

use super::{parse_category, parse_letter, Paths, MSG_HINT_FAILED};

pub async fn execute(paths: &Paths, category: String, letter: char) -> Result<()> {
    let category = parse_category(&category)?;
    let letter = parse_letter(letter)?;
    let policy = paths.policy()?;

    let hint = policy
        .hint(&category, &letter)
        .await
        .context(MSG_HINT_FAILED)?;
    println!("{hint}");
    Ok(())
}
