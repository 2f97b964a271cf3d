//! Query layer - row materialization and summaries over resource tables

pub mod rows;
pub mod summary;

pub use rows::RowMaterializer;
pub use summary::{Summary, SummaryAggregator, SummaryMap};
