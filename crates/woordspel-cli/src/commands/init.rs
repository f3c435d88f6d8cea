//! The `woordspel init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("woordspel.toml").exists() {
        println!("woordspel.toml already exists, skipping.");
    } else {
        std::fs::write("woordspel.toml", SAMPLE_CONFIG)?;
        println!("Created woordspel.toml");
    }

    println!("\nNext steps:");
    println!("  1. Start a relay with OPENROUTER_API_KEY set: woordspel relay");
    println!("     (or switch [judge] to type = \"direct\")");
    println!("  2. Play: woordspel play");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# woordspel configuration

# Where accepted answers are remembered.
cache_path = "./woordspel-answers.json"

# Upper bound on a single judge call.
timeout_secs = 10

# Judge through a relay that holds the provider key.
[judge]
type = "relay"
url = "http://127.0.0.1:8787/"

# Or call OpenRouter directly with a local key:
# [judge]
# type = "direct"
# api_key = "${OPENROUTER_API_KEY}"
# model = "openai/gpt-oss-20b:free"
"#;
