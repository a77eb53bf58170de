use std::path::PathBuf;

use anyhow::{Context, Result};
use brc_pipeline::config::{default_workers, DEFAULT_BUFFER_LEN, DEFAULT_CHUNK_SIZE};
use brc_pipeline::{aggregate_files, format_summary, PipelineConfig};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rs-1brc-pipeline")]
#[command(about = "Per-station min/mean/max over a `station;value` file")]
struct Cli {
    /// Input file; repeat to aggregate several files into one result
    #[arg(long = "filename", default_value = "measurements.txt")]
    filenames: Vec<PathBuf>,

    /// Lines per chunk handed to a worker
    #[arg(long = "chunksize", default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Capacity of the chunk queue
    #[arg(long = "buffersize", default_value_t = DEFAULT_BUFFER_LEN)]
    buffer_len: usize,

    /// Fold worker threads (default: available parallelism minus one)
    #[arg(long)]
    workers: Option<usize>,

    /// Number of sorted stations to print
    #[arg(long, default_value_t = 10)]
    limit: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = PipelineConfig {
        chunk_size: cli.chunk_size,
        buffer_len: cli.buffer_len,
        workers: cli.workers.unwrap_or_else(default_workers),
    };

    let (table, elapsed) = timeit(|| aggregate_files(&cli.filenames, &config));
    let table = table.with_context(|| format!("failed to aggregate {:?}", cli.filenames))?;

    info!("Total number of stations: {}", table.len());
    println!("{}", format_summary(&table, cli.limit));
    info!(?elapsed, "main finished");
    Ok(())
}

fn timeit<T, F: FnOnce() -> T>(f: F) -> (T, std::time::Duration) {
    let start = std::time::Instant::now();
    let result = f();
    (result, start.elapsed())
}
