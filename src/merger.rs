use crossbeam_channel::Receiver;
use tracing::debug;

use crate::error::Result;
use crate::table::AggregateTable;

/// Drain worker outcomes until the results queue closes, folding each
/// partial table into one. The first failure ends the drain.
pub fn merge_results(results: Receiver<Result<AggregateTable>>) -> Result<AggregateTable> {
    let mut merged = AggregateTable::new();
    let mut partials = 0usize;
    for outcome in results.iter() {
        merged.merge(outcome?);
        partials += 1;
    }
    debug!(partials, stations = merged.len(), "merged partial tables");
    Ok(merged)
}
