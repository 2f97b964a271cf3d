//! # Resledger - resource inventory ledger
//!
//! Data-access layer for a resource inventory / cost reporting tool.
//!
//! Resledger provides:
//! - An execution ledger and an append-only status ledger per resource table
//! - Generic materialization of schema-unknown resource tables into typed values
//! - Per-execution summaries (row count, monthly spend, latest status)
//! - A table catalog with best-effort bulk cleanup

pub mod value;
pub mod status;
pub mod storage;
pub mod query;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use value::{Record, Value};
pub use status::{Execution, ExecutionId, NewStatus, ResourceStatus, StatusRecord};
pub use storage::{SqliteStore, StatusLedger, TableCatalog, TableName};
pub use query::{RowMaterializer, Summary, SummaryAggregator};

/// Result type alias for Resledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Resledger operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot open database {path}: {source}")]
    Connectivity {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Invalid status value in ledger: {0}")]
    InvalidStatus(i64),

    #[error("Unknown status: {0}")]
    UnknownStatus(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

impl Error {
    /// True for failures of a scan, count, sum or ledger lookup
    pub fn is_query_failure(&self) -> bool {
        matches!(
            self,
            Error::Query(_) | Error::UnknownTable(_) | Error::InvalidStatus(_)
        )
    }
}
