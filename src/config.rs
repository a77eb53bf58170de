use std::num::NonZeroUsize;
use std::thread;

use crate::error::{Error, Result};

pub const DEFAULT_CHUNK_SIZE: usize = 10;
pub const DEFAULT_BUFFER_LEN: usize = 1000;

/// Tuning knobs for one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Lines per chunk.
    pub chunk_size: usize,
    /// Capacity of the chunk queue.
    pub buffer_len: usize,
    pub workers: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            buffer_len: DEFAULT_BUFFER_LEN,
            workers: default_workers(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::Config("chunk size must be at least 1".to_string()));
        }
        if self.buffer_len == 0 {
            return Err(Error::Config("buffer length must be at least 1".to_string()));
        }
        if self.workers == 0 {
            return Err(Error::Config("worker count must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// One worker per hardware thread, minus the one reading the file.
pub fn default_workers() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
        .saturating_sub(1)
        .max(1)
}
