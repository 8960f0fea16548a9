//! # frag-io: Snapshot Input and Result Output
//!
//! - [`assets`] reads the structure snapshot CSV into [`AssetRecord`](frag_core::AssetRecord)s
//! - [`scores`] reads a replacement classification score table
//! - [`table`] flattens results into the wide, fixed-precision output table
//! - [`sinks`] writes that table (CSV) or the structured results (JSON lines)

pub mod assets;
pub mod scores;
pub mod sinks;
pub mod table;

pub use assets::{read_assets, AssetSnapshot, PASSTHROUGH_COLUMNS};
pub use scores::read_score_table;
pub use sinks::{CsvSink, JsonLinesSink, ResultSink, RunOutput};
pub use table::{Decimal, WideTable};
