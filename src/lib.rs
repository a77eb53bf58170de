//! Streaming min/mean/max aggregation over `station;value` files.
//!
//! A single reader thread cuts the input into chunks of lines and pushes them
//! onto a bounded queue. Fold workers each build a private
//! [`AggregateTable`] from whatever chunks they receive, then hand it to the
//! merger, which combines the partial tables into the final result.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod merger;
pub mod pipeline;
pub mod present;
pub mod reader;
pub mod record;
pub mod table;
pub mod worker;

pub use aggregate::Aggregate;
pub use config::PipelineConfig;
pub use error::{Error, ParseError, ParseErrorKind, Result};
pub use pipeline::{aggregate_file, aggregate_files, Pipeline};
pub use present::format_summary;
pub use reader::{Chunk, ChunkReader};
pub use table::AggregateTable;
