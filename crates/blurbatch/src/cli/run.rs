//! The `blurbatch run` command: start the pool and wait for it to finish or
//! for Ctrl-C.

use blurbatch_core::{Config, Coordinator, ProcessingStats, ShutdownHandle};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the `run` command.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Input directory (overrides `directories.input_dir`)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output directory (overrides `directories.output_dir`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of worker threads (overrides `pool.consumer_count`)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Blur window size, odd (overrides `blur.filter_size`)
    #[arg(long)]
    pub filter_size: Option<usize>,

    /// Scan the input directory once, drain the queue and exit
    #[arg(long)]
    pub once: bool,

    /// Print final statistics to stdout as JSON
    #[arg(long)]
    pub json_stats: bool,
}

impl RunArgs {
    /// Apply command-line overrides on top of the loaded configuration.
    fn apply(&self, config: &mut Config) {
        if let Some(input) = &self.input {
            config.directories.input_dir = input.clone();
        }
        if let Some(output) = &self.output {
            config.directories.output_dir = output.clone();
        }
        if let Some(workers) = self.workers {
            config.pool.consumer_count = workers;
        }
        if let Some(filter_size) = self.filter_size {
            config.blur.filter_size = filter_size;
        }
        if self.once {
            config.pool.max_passes = Some(1);
        }
    }
}

/// Execute the run command.
pub async fn execute(args: RunArgs, mut config: Config) -> anyhow::Result<()> {
    args.apply(&mut config);

    let handle = Coordinator::new(config).start()?;
    let shutdown = handle.shutdown_handle();
    let mut join = tokio::task::spawn_blocking(move || handle.join());

    let stats: ProcessingStats = tokio::select! {
        stats = &mut join => stats?,
        signal = tokio::signal::ctrl_c() => {
            on_interrupt(signal, &shutdown);
            join.await?
        }
    };

    if args.json_stats {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    }
    if stats.failed > 0 {
        tracing::warn!("{} image(s) failed", stats.failed);
    }
    Ok(())
}

/// Stop the pool on Ctrl-C. A failed handler install leaves it running.
fn on_interrupt(signal: std::io::Result<()>, shutdown: &ShutdownHandle) {
    match signal {
        Ok(()) => {
            tracing::info!("Interrupt received, shutting down");
            shutdown.shutdown();
        }
        Err(e) => tracing::warn!("Cannot listen for Ctrl-C, running until done: {}", e),
    }
}
