//! The `woordspel cache` commands.

use anyhow::Result;
use comfy_table::{Cell, Table};

use woordspel_core::model::Letter;
use woordspel_core::AnswerCache;

use super::{parse_category, parse_letter, Paths};

pub fn stats(paths: &Paths) -> Result<()> {
    let cache = paths.cache_only()?;
    print_stats(&cache);
    Ok(())
}

fn print_stats(cache: &AnswerCache) {
    let mut table = Table::new();
    table.set_header(vec!["Category", "Answers", "Letters covered"]);

    for (category, letters) in &cache.document().categories {
        let answers: usize = letters.values().map(|a| a.len()).sum();
        let covered = letters.values().filter(|a| !a.is_empty()).count();
        table.add_row(vec![
            Cell::new(category),
            Cell::new(answers),
            Cell::new(format!("{covered}/{}", letters.len())),
        ]);
    }

    println!("{table}");
    let location = cache
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(in memory)".to_string());
    println!("{} answers in {location}", cache.len());
}

pub fn show(paths: &Paths, category: String, letter: Option<char>) -> Result<()> {
    let category = parse_category(&category)?;
    let letters: Vec<Letter> = match letter {
        Some(l) => vec![parse_letter(l)?],
        None => Letter::all().collect(),
    };
    let cache = paths.cache_only()?;

    println!("{category}:");
    let mut shown = 0;
    for letter in &letters {
        let Some(answers) = cache.answers(&category, letter) else {
            continue;
        };
        if answers.is_empty() {
            continue;
        }
        let list: Vec<&str> = answers.iter().map(String::as_str).collect();
        println!("  {letter}: {}", list.join(", "));
        shown += answers.len();
    }

    if shown == 0 {
        println!("  (no answers yet)");
    }
    Ok(())
}
