//! blurbatch CLI - watch a directory and box-blur every image that lands in it.
//!
//! A scanner thread lists the input directory and feeds a bounded queue; a pool
//! of worker threads blurs each image and writes it to the output directory.
//!
//! # Usage
//!
//! ```bash
//! # Watch ./input forever, writing to ./output
//! blurbatch run
//!
//! # Blur everything in a directory once and exit
//! blurbatch run --input ./photos --output ./blurred --once
//!
//! # View configuration
//! blurbatch config show
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;

/// blurbatch - directory-watching box-blur batch processor.
#[derive(Parser, Debug)]
#[command(name = "blurbatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(short, long, global = true, env = "BLURBATCH_CONFIG")]
    config: Option<PathBuf>,

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
    /// Start the scanner and worker pool
    Run(cli::run::RunArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let loaded = match &cli.config {
        Some(path) => blurbatch_core::Config::load_from(path),
        None => blurbatch_core::Config::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) if cli.config.is_some() => return Err(e.into()),
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `blurbatch config path`."
            );
            blurbatch_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("blurbatch v{}", blurbatch_core::VERSION);

    match cli.command {
        Commands::Run(args) => cli::run::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, config, cli.config).await,
    }
}
