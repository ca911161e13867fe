//! Vista CLI - collect, validate, and catalogue interior photographs.
//!
//! Vista downloads candidate photos from sample lists, the COCO dataset host,
//! and stock-photo search APIs, keeps the ones that pass basic quality gates,
//! and writes them with provenance metadata into a dataset directory.
//!
//! # Usage
//!
//! ```bash
//! # Collect from every source into the configured dataset directory
//! vista collect
//!
//! # Collect 50 COCO images with CSV metadata
//! vista collect --source coco --limit 50 --format csv
//!
//! # Summarize what is on disk
//! vista stats
//!
//! # View configuration
//! vista config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Vista - photo acquisition pipeline for annotated training datasets.
#[derive(Parser, Debug)]
#[command(name = "vista")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Download, validate, and store images from one or more sources
    Collect(cli::collect::CollectArgs),

    /// Write the blank annotation template CSV
    Template(cli::template::TemplateArgs),

    /// Count stored images per source
    Stats(cli::stats::StatsArgs),

    /// List stored images whose metadata mentions a keyword
    Filter(cli::filter::FilterArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match vista_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default logging settings. Check your config file with `vista config path`."
            );
            vista_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Vista v{}", vista_core::VERSION);

    match cli.command {
        Commands::Collect(args) => cli::collect::execute(args).await,
        Commands::Template(args) => cli::template::execute(args).await,
        Commands::Stats(args) => cli::stats::execute(args).await,
        Commands::Filter(args) => cli::filter::execute(args).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
