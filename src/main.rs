//! # Holocron CLI
//!
//! The `holocron` binary runs the two catalog aggregation pipelines.
//!
//! ## Usage
//!
//! ```bash
//! holocron --config ./config/holocron.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `holocron sample` | Sample random characters, index their films, persist to MySQL |
//! | `holocron hydrate` | Expand one film's references and write `task_two.json` |
//!
//! ## Examples
//!
//! ```bash
//! # Index 15 random characters (prompts for MySQL credentials)
//! holocron sample
//!
//! # Smaller sample
//! holocron sample --count 5
//!
//! # Hydrate the configured film into ./task_two.json
//! holocron hydrate
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use holocron::{config, hydrate, sample};

/// Holocron aggregates characters and films from a sci-fi media catalog
/// API into MySQL tables or a hydrated JSON document.
#[derive(Parser)]
#[command(
    name = "holocron",
    about = "Aggregate characters and films from a sci-fi media catalog API",
    version,
    long_about = "Holocron runs two independent aggregation pipelines against a public \
    sci-fi media catalog API: `sample` discovers which characters appear in which films \
    and persists the grouping to MySQL (one table per film), and `hydrate` expands every \
    reference of a single film into full records and writes them as indented JSON."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/holocron.toml`. Built-in defaults are used
    /// when the file does not exist.
    #[arg(long, global = true, default_value = "./config/holocron.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Sample random characters and index their film appearances.
    ///
    /// Draws random character ids, fetches each character and every film
    /// it appears in, prints the film index as pretty JSON, and writes
    /// one database table per film with one unique row per character.
    /// Prompts for MySQL credentials; the database is created on first
    /// run. Re-runs are idempotent at the row level.
    Sample {
        /// Number of characters to sample (overrides `sample.count`).
        #[arg(long)]
        count: Option<usize>,
    },

    /// Hydrate one film into a fully expanded JSON document.
    ///
    /// Fetches the configured film, replaces every referenced character,
    /// planet, starship, vehicle, and species URL with the fetched
    /// record, converts character measurements to imperial units, strips
    /// nested reference lists, and writes the result to the configured
    /// output file (default `task_two.json`), overwriting it.
    Hydrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Sample { count } => {
            sample::run_sample(&cfg, count).await?;
        }
        Commands::Hydrate => {
            hydrate::run_hydrate(&cfg).await?;
        }
    }

    Ok(())
}
