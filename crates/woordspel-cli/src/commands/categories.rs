//! The `woordspel categories` command.

use anyhow::Result;

use woordspel_core::model::{Category, Letter};

pub fn execute() -> Result<()> {
    println!("Categories:");
    for category in Category::all() {
        println!("  {category}");
    }

    let letters: Vec<String> = Letter::all().map(|l| l.to_string()).collect();
    println!("\nLetters: {}", letters.join(" "));
    Ok(())
}
