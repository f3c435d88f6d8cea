//! woordspel CLI — play the word game, query the judge, inspect the cache, run the relay.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "woordspel", version, about = "Dutch category-and-letter word game")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Answer cache path (overrides `cache_path` from the config)
    #[arg(long, global = true)]
    cache: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play interactively: type a word, `?` for a hint, `!` to skip, `q` to quit
    Play,

    /// Check a single answer
    Check {
        /// Category, e.g. "Een dier"
        #[arg(long)]
        category: String,

        /// Starting letter
        #[arg(long)]
        letter: char,

        /// The answer to check
        #[arg(long)]
        word: String,
    },

    /// Ask the judge for a hint
    Hint {
        #[arg(long)]
        category: String,

        #[arg(long)]
        letter: char,
    },

    /// Inspect the answer cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// List categories and letters
    Categories,

    /// Run the relay server that holds the provider key
    Relay {
        /// Bind host (default: WOORDSPEL_RELAY_HOST, HOST or 127.0.0.1)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (default: WOORDSPEL_RELAY_PORT, PORT or 8787)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Create a starter woordspel.toml
    Init,
}

#[derive(Subcommand)]
enum CacheAction {
    /// Answer counts per category
    Stats,

    /// List the stored answers for a category
    Show {
        #[arg(long)]
        category: String,

        /// Only this letter
        #[arg(long)]
        letter: Option<char>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("woordspel=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let paths = commands::Paths {
        config: cli.config,
        cache: cli.cache,
    };

    let result = match cli.command {
        Commands::Play => commands::play::execute(&paths).await,
        Commands::Check {
            category,
            letter,
            word,
        } => commands::check::execute(&paths, category, letter, word).await,
        Commands::Hint { category, letter } => {
            commands::hint::execute(&paths, category, letter).await
        }
        Commands::Cache { action } => match action {
            CacheAction::Stats => commands::cache::stats(&paths),
            CacheAction::Show { category, letter } => {
                commands::cache::show(&paths, category, letter)
            }
        },
        Commands::Categories => commands::categories::execute(),
        Commands::Relay { host, port } => commands::relay::execute(host, port).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
