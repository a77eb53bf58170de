use std::io::BufRead;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::thread;
use std::time::Instant;

use crossbeam_channel::bounded;
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::merger::merge_results;
use crate::reader::ChunkReader;
use crate::table::AggregateTable;
use crate::worker::WorkerPool;

/// Reader, fold workers and merger wired together over two bounded queues.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Aggregate everything `reader` produces.
    ///
    /// The reader and the workers run on scoped threads; the calling thread
    /// merges partial tables as they arrive. A malformed record takes
    /// precedence over a read failure; either way no table is returned.
    /// Chunks are cut to the pipeline's configured size.
    pub fn run<R: BufRead + Send>(&self, reader: ChunkReader<R>) -> Result<AggregateTable> {
        let config = self.config;
        let reader = reader.with_chunk_size(config.chunk_size)?;
        info!(
            input = reader.input(),
            buffer_len = config.buffer_len,
            chunk_size = config.chunk_size,
            workers = config.workers,
            "calculating aggregates"
        );
        let started = Instant::now();

        let (chunk_tx, chunk_rx) = bounded(config.buffer_len);
        // One slot per worker: publishing never blocks.
        let (result_tx, result_rx) = bounded(config.workers);
        let abort = AtomicBool::new(false);
        let abort = &abort;

        let (merged, read, workers_ok) = thread::scope(|s| {
            let reader = s.spawn(move || reader.run(chunk_tx, abort));
            let workers = WorkerPool::spawn(s, config.workers, chunk_rx, result_tx, abort);

            let merged = merge_results(result_rx);

            let workers_ok = workers
                .into_iter()
                .map(|handle| handle.join().is_ok())
                .fold(true, |ok, joined| ok && joined);
            (merged, reader.join(), workers_ok)
        });

        if !workers_ok {
            return Err(Error::ThreadPanicked("fold worker"));
        }
        let merged = merged?;
        let summary = read.map_err(|_| Error::ThreadPanicked("chunk reader"))??;
        if summary.aborted {
            // Only reachable when workers vanished without reporting.
            warn!(lines = summary.lines, "reader stopped before end of input");
            return Err(Error::ThreadPanicked("fold worker"));
        }

        info!(
            lines = summary.lines,
            chunks = summary.chunks,
            stations = merged.len(),
            elapsed = ?started.elapsed(),
            "aggregation finished"
        );
        Ok(merged)
    }

    pub fn run_file(&self, path: &Path) -> Result<AggregateTable> {
        self.run(ChunkReader::open(path, self.config.chunk_size)?)
    }
}

/// Aggregate a single file.
pub fn aggregate_file(path: impl AsRef<Path>, config: &PipelineConfig) -> Result<AggregateTable> {
    Pipeline::new(*config)?.run_file(path.as_ref())
}

/// Aggregate several files, one pipeline run each, and merge the results
/// into a single table.
pub fn aggregate_files<I>(paths: I, config: &PipelineConfig) -> Result<AggregateTable>
where
    I: IntoIterator,
    I::Item: AsRef<Path>,
{
    let pipeline = Pipeline::new(*config)?;
    let tables = paths
        .into_iter()
        .map(|path| pipeline.run_file(path.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    Ok(AggregateTable::merge_all(tables))
}
