mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "salvation")]
#[command(version, about = "Salvation CLI - check form snapshots against their declared rules", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a JSON form snapshot as a submit attempt would
    Check {
        /// JSON file holding an array of fields
        form: PathBuf,

        /// Config file (default: ./salvation.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the default date format
        #[arg(long)]
        date_format: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the pattern a date format compiles to
    Pattern {
        /// Date format, e.g. "MM/DD/YYYY"
        format: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            form,
            config,
            date_format,
            json,
        } => {
            let blocked = commands::check::execute(&form, config.as_deref(), date_format, json)?;
            if blocked {
                std::process::exit(1);
            }
        }
        Commands::Pattern { format } => {
            commands::pattern::execute(&format)?;
        }
    }

    Ok(())
}
