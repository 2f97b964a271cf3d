//! Storage Layer - SQLite-backed persistence
//!
//! Ledger tables owned by this crate:
//! - executions(id, name, created_at)
//! - resource_status(id, table_name, status, description, execution_id, created_at)
//!
//! Every other table is a resource table written by a collector, named after
//! the resource kind and carrying an `execution_id` column.

pub mod schema;
pub mod sqlite;
pub mod table;
pub mod catalog;
pub mod ledger;

pub use sqlite::SqliteStore;
pub use table::{TableName, TableQuery};
pub use catalog::{TableCatalog, ClearReport, CleanupError};
pub use ledger::StatusLedger;
