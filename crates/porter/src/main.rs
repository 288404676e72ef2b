//! Porter CLI - project chores: run the check gate, publish the docs site.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "porter")]
#[command(about = "Run the project's check gate and publish its docs site")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to porter.toml config file
    #[arg(short, long, default_value = "porter.toml", global = true)]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run fmt, update, clippy, check, doc, build, bench and test in order
    Check {
        /// Stop at the first failing step
        #[arg(long)]
        strict: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// List the steps without running them
        #[arg(long)]
        list: bool,
    },

    /// Rebuild the site and republish it as the docs directory
    Publish {
        /// Output directory (defaults to config or "docs")
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Normalize an already published entry document in place
    Transform {
        /// HTML file to rewrite
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let file_config = config::load_config(&cli.config)?;

    // Execute command
    match cli.command {
        Commands::Check { strict, json, list } => {
            commands::check::run(&file_config.check, strict, json, list)?;
        }
        Commands::Publish { output } => {
            commands::publish::run(&file_config.publish, output)?;
        }
        Commands::Transform { file } => {
            commands::transform::run(&file)?;
        }
    }

    Ok(())
}
