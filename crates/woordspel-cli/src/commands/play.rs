//! The `woordspel play` command: an interactive round loop on stdin.

use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use woordspel_core::model::Verdict;
use woordspel_core::{Game, HintError, VerifyError};

use super::{Paths, MSG_ACCEPTED, MSG_CHECK_FAILED, MSG_EMPTY, MSG_HINT_FAILED, MSG_REJECTED};

/// One line of player input.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Quit,
    Hint,
    Skip,
    Answer(&'a str),
}

impl<'a> Input<'a> {
    fn parse(line: &'a str) -> Self {
        match line.trim() {
            "q" => Input::Quit,
            "?" => Input::Hint,
            "!" => Input::Skip,
            _ => Input::Answer(line),
        }
    }
}

fn wants_another_round(reply: &str) -> bool {
    matches!(reply.trim().to_lowercase().as_str(), "j" | "ja" | "y" | "yes")
}

fn prompt(text: &str) -> Result<()> {
    print!("{text}");
    std::io::stdout().flush()?;
    Ok(())
}

pub async fn execute(paths: &Paths) -> Result<()> {
    let mut game = Game::new(paths.policy()?);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!(
        "Woordspel! Typ een woord, ? voor een hint, ! voor een nieuwe vraag, q om te stoppen."
    );
    println!("\nNoem: {}", game.round().question());

    loop {
        prompt("> ")?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match Input::parse(&line) {
            Input::Quit => break,
            Input::Skip => {
                game.start_round();
                println!("\nNoem: {}", game.round().question());
            }
            Input::Hint => match game.request_hint().await {
                Ok(hint) => println!("Hint: {hint}"),
                Err(HintError::RoundOver) => println!("Deze ronde is al goed beantwoord."),
                Err(HintError::JudgeUnavailable(_)) => println!("{MSG_HINT_FAILED}"),
            },
            Input::Answer(word) => match game.submit(word).await {
                Ok(Verdict::Accepted) => {
                    println!("{MSG_ACCEPTED}");
                    prompt("Nog een ronde? (j/n) ")?;
                    let reply = lines.next_line().await?.unwrap_or_default();
                    if !wants_another_round(&reply) {
                        break;
                    }
                    game.start_round();
                    println!("\nNoem: {}", game.round().question());
                }
                Ok(Verdict::Rejected) => println!("{MSG_REJECTED}"),
                Err(VerifyError::EmptyAnswer) => println!("{MSG_EMPTY}"),
                Err(VerifyError::JudgeUnavailable(_)) => println!("{MSG_CHECK_FAILED}"),
            },
        }
    }

    println!("Tot ziens!");
    Ok(())
}
