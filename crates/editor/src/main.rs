//! `dex`: command-line editor for move and Pokemon data files.
//!
//! Records live in `<table>.toml.bytes` files inside one data directory.
//! Every edit loads the table, changes one record and saves the whole
//! document back atomically.

mod commands;
mod config;
mod logging;
mod output;
mod session;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use commands::{Check, MovesCommand, PokemonCommand, Refs};
use config::EditorConfig;
use dex_content::DataDir;
use dex_core::KeyStyle;
use output::OutputFormat;
use session::Session;

/// Edit move and Pokemon data files
#[derive(Parser)]
#[command(name = "dex")]
#[command(about = "Edit move and Pokemon data files", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding the data files (defaults to DEX_DATA_DIR, then the executable's directory)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// How names map to record keys: underscore or collapse
    #[arg(long, global = true, value_name = "STYLE")]
    key_style: Option<KeyStyle>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "summary")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Edit the Moves table
    #[command(subcommand)]
    Moves(MovesCommand),

    /// Edit the Pokemon table
    #[command(subcommand)]
    Pokemon(PokemonCommand),

    /// List the names of a referenced table
    Refs(Refs),

    /// Report dangling references
    Check(Check),
}

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = EditorConfig::from_env().with_overrides(cli.data_dir, cli.key_style);
    let _guard = logging::setup_logging(&config)?;

    let data_dir = config.resolve_data_dir()?;
    tracing::info!(
        "Data directory: {} (key style: {})",
        data_dir.display(),
        config.key_style
    );
    let session = Session::new(DataDir::new(data_dir), config.key_style, cli.format);

    let message = match cli.command {
        Command::Moves(cmd) => cmd.execute(&session),
        Command::Pokemon(cmd) => cmd.execute(&session),
        Command::Refs(cmd) => cmd.execute(&session),
        Command::Check(cmd) => cmd.execute(&session),
    }
    .inspect_err(|e| tracing::error!("Command failed: {:#}", e))?;

    if !message.is_empty() {
        println!("{message}");
    }
    Ok(())
}
