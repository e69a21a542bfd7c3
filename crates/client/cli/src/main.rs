//! Command line inspector for character sheets.
//!
//! Loads content from a data directory, keeps sheets in a JSON file store and
//! prints or mutates them. Run with `sheet-cli --help`.
mod commands;
mod config;
mod dirs;
mod logging;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use commands::{Command, Context};
use config::CliConfig;

/// Attribute & resource sheet inspector
#[derive(Parser)]
#[command(name = "sheet-cli")]
#[command(about = "Inspect and drive character sheets", long_about = None)]
#[command(version)]
struct Cli {
    /// Content directory (formulas.ron, sheet.toml, config.toml)
    #[arg(short, long, value_name = "DIR", global = true)]
    content: Option<PathBuf>,

    /// Store directory (defaults to platform-specific location)
    #[arg(short, long, value_name = "DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Owner id of the sheet to operate on
    #[arg(short, long, value_name = "ID", global = true)]
    owner: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = CliConfig::from_env()?;
    if let Some(content) = cli.content {
        config.content_dir = content;
    }
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(owner) = cli.owner {
        config.owner = owner;
    }

    let _guard = logging::setup_logging(&config.session_id)?;

    cli.command.execute(&Context::new(config))
}
