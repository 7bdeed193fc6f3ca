//! Marquee CLI - Headless Catalog Player and QC Tool
//!
//! Features:
//! - Catalog listing grouped by category
//! - Descriptor inspection (provider ids, embed sources)
//! - Stream reachability validation
//! - Headless playback through the real controller

use clap::{Parser, Subcommand};
use marquee_core::{PlayerConfig, StreamKind};
use std::path::PathBuf;

mod commands;
mod headless;
mod output;

/// Marquee CLI - Catalog player toolkit
#[derive(Parser)]
#[command(name = "marquee-cli")]
#[command(version)]
#[command(about = "Catalog inspection and headless playback toolkit", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json, table)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Player configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List a catalog grouped by category
    Catalog {
        /// Catalog URL or file (defaults to the configured catalog)
        source: Option<String>,
    },

    /// Show how a locator resolves
    Inspect {
        /// Stream locator
        locator: String,

        /// Stream type (youtube, mp4, hls)
        #[arg(short, long, default_value = "youtube")]
        kind: StreamKind,
    },

    /// Check that every stream in a catalog can start
    Validate {
        /// Catalog URL or file (defaults to the configured catalog)
        source: Option<String>,

        /// Exit with an error if any stream fails
        #[arg(long)]
        strict: bool,
    },

    /// Play a catalog item headlessly
    Play {
        /// Item name
        item: String,

        /// Catalog URL or file (defaults to the configured catalog)
        #[arg(short, long)]
        source: Option<String>,

        /// Episode title or 1-based index, for series
        #[arg(short, long)]
        episode: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(level)
        .init();

    marquee_core::init();

    let config = match &cli.config {
        Some(path) => PlayerConfig::from_file(path)?,
        None => PlayerConfig::default(),
    };

    match cli.command {
        Commands::Catalog { source } => {
            let source = source.unwrap_or_else(|| config.catalog_url.clone());
            commands::catalog(&config, &source, &cli.format).await?;
        }
        Commands::Inspect { locator, kind } => {
            commands::inspect(&config, kind, &locator, &cli.format)?;
        }
        Commands::Validate { source, strict } => {
            let source = source.unwrap_or_else(|| config.catalog_url.clone());
            commands::validate(&config, &source, strict, &cli.format).await?;
        }
        Commands::Play { item, source, episode } => {
            let source = source.unwrap_or_else(|| config.catalog_url.clone());
            commands::play(&config, &source, &item, episode.as_deref(), &cli.format).await?;
        }
    }

    Ok(())
}
