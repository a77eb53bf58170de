use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{Scope, ScopedJoinHandle};

use crossbeam_channel::{Receiver, Sender};
use tracing::debug;

use crate::error::{ParseError, Result};
use crate::reader::Chunk;
use crate::record::parse_line;
use crate::table::AggregateTable;

/// Fold every record of `chunk` into `table`, stopping at the first
/// malformed line.
pub fn fold_chunk(table: &mut AggregateTable, chunk: &Chunk) -> std::result::Result<(), ParseError> {
    for (offset, line) in chunk.lines.iter().enumerate() {
        if let Some((key, value)) = parse_line(line, chunk.first_line + offset)? {
            table.upsert(key, value);
        }
    }
    Ok(())
}

/// Share-nothing fold workers, each owning one private table.
pub struct WorkerPool;

impl WorkerPool {
    /// Spawn `workers` threads on `scope`. Each publishes exactly one
    /// outcome on `results` unless the run was aborted by someone else.
    pub fn spawn<'scope, 'env>(
        scope: &'scope Scope<'scope, 'env>,
        workers: usize,
        chunks: Receiver<Chunk>,
        results: Sender<Result<AggregateTable>>,
        abort: &'env AtomicBool,
    ) -> Vec<ScopedJoinHandle<'scope, ()>> {
        (0..workers)
            .map(|id| {
                let chunks = chunks.clone();
                let results = results.clone();
                scope.spawn(move || work(id, chunks, results, abort))
            })
            .collect()
    }
}

fn work(id: usize, chunks: Receiver<Chunk>, results: Sender<Result<AggregateTable>>, abort: &AtomicBool) {
    let mut table = AggregateTable::new();
    let mut folded = 0usize;

    for chunk in chunks.iter() {
        if abort.load(Ordering::Acquire) {
            debug!(worker = id, "run aborted, dropping partial table");
            return;
        }
        if let Err(err) = fold_chunk(&mut table, &chunk) {
            abort.store(true, Ordering::Release);
            debug!(worker = id, line = err.line, "malformed record");
            if results.send(Err(err.into())).is_err() {
                debug!(worker = id, "merger is gone, parse error discarded");
            }
            return;
        }
        folded += 1;
    }

    debug!(worker = id, chunks = folded, stations = table.len(), "publishing partial table");
    if results.send(Ok(table)).is_err() {
        debug!(worker = id, "merger is gone, partial table discarded");
    }
}
