use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::Sender;
use tracing::debug;

use crate::error::{Error, Result};

/// Consecutive raw lines moved as one unit from the reader to a worker.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// 1-based line number of `lines[0]`.
    pub first_line: usize,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadSummary {
    pub lines: usize,
    pub chunks: usize,
    pub aborted: bool,
}

/// Sequential line reader that hands out fixed-size chunks.
pub struct ChunkReader<R> {
    source: R,
    input: String,
    chunk_size: usize,
}

impl ChunkReader<BufReader<File>> {
    pub fn open(path: &Path, chunk_size: usize) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::Io {
            input: path.display().to_string(),
            line: 0,
            source,
        })?;
        Self::new(BufReader::new(file), path.display().to_string(), chunk_size)
    }
}

impl<R: BufRead> ChunkReader<R> {
    /// `input` names the source in error messages.
    pub fn new(source: R, input: impl Into<String>, chunk_size: usize) -> Result<Self> {
        Self {
            source,
            input: input.into(),
            chunk_size: 1,
        }
        .with_chunk_size(chunk_size)
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::Config("chunk size must be at least 1".to_string()));
        }
        self.chunk_size = chunk_size;
        Ok(self)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Read to end of input, sending every chunk (the last one possibly
    /// short) on `chunks`. The queue closes when this returns and drops the
    /// sender.
    pub fn run(self, chunks: Sender<Chunk>, abort: &AtomicBool) -> Result<ReadSummary> {
        let ChunkReader {
            source,
            input,
            chunk_size,
        } = self;

        let mut summary = ReadSummary {
            lines: 0,
            chunks: 0,
            aborted: false,
        };
        let mut pending = Vec::with_capacity(chunk_size);
        let mut first_line = 1;

        for line in source.lines() {
            let line = line.map_err(|source| {
                abort.store(true, Ordering::Release);
                Error::Io {
                    input: input.clone(),
                    line: summary.lines + 1,
                    source,
                }
            })?;
            summary.lines += 1;
            pending.push(line);

            if pending.len() == chunk_size {
                let lines = std::mem::replace(&mut pending, Vec::with_capacity(chunk_size));
                if !publish(&chunks, Chunk { first_line, lines }, abort) {
                    summary.aborted = true;
                    return Ok(summary);
                }
                summary.chunks += 1;
                first_line = summary.lines + 1;
            }
        }

        if !pending.is_empty() {
            if !publish(&chunks, Chunk { first_line, lines: pending }, abort) {
                summary.aborted = true;
                return Ok(summary);
            }
            summary.chunks += 1;
        }

        debug!(input = %input, lines = summary.lines, chunks = summary.chunks, "closing chunk queue");
        Ok(summary)
    }
}

/// Blocks while the queue is full. `false` means nobody will consume it.
fn publish(chunks: &Sender<Chunk>, chunk: Chunk, abort: &AtomicBool) -> bool {
    if abort.load(Ordering::Acquire) {
        return false;
    }
    chunks.send(chunk).is_ok()
}
