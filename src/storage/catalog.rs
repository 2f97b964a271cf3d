//! Table catalog - discovery and best-effort cleanup

use crate::{Error, Result};
use super::schema::LEDGER_TABLES;
use super::sqlite::SqliteStore;
use super::table::{TableName, TableQuery};

/// A single failure during best-effort cleanup.
#[derive(Debug, thiserror::Error)]
pub enum CleanupError {
    #[error("Could not list tables: {0}")]
    ListTables(#[source] Error),

    #[error("Could not drop table {table}: {source}")]
    DropTable {
        table: String,
        #[source]
        source: Error,
    },
}

/// Outcome of [`TableCatalog::clear_tables`].
#[derive(Debug, Default)]
pub struct ClearReport {
    pub dropped: Vec<String>,
    pub failures: Vec<CleanupError>,
}

impl ClearReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Lists the tables in the store and hands out [`TableName`]s for them.
pub struct TableCatalog<'a> {
    store: &'a SqliteStore,
}

impl<'a> TableCatalog<'a> {
    pub fn new(store: &'a SqliteStore) -> Self {
        Self { store }
    }

    /// All user tables, ordered by name
    pub fn list_tables(&self) -> Result<Vec<TableName>> {
        let mut stmt = self.store.conn().prepare(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;

        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(names.into_iter().map(TableName::from_catalog).collect())
    }

    /// Tables written by collectors (everything except the ledger tables)
    pub fn resource_tables(&self) -> Result<Vec<TableName>> {
        let tables = self.list_tables()?;
        Ok(tables
            .into_iter()
            .filter(|t| !LEDGER_TABLES.contains(&t.as_str()))
            .collect())
    }

    /// Turn an external table name into a trusted one; matching ignores
    /// ASCII case, as SQLite identifiers do
    pub fn resolve(&self, name: &str) -> Result<TableName> {
        self.list_tables()?
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownTable(name.to_string()))
    }

    /// Check whether `table` has a column called `column`
    pub fn has_column(&self, table: &TableName, column: &str) -> Result<bool> {
        let count: i64 = self.store.conn().query_row(
            "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
            [table.as_str(), column],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn drop_table(&self, table: &TableName) -> Result<()> {
        self.store.conn().execute(&TableQuery::new(table).drop_table(), [])?;
        Ok(())
    }

    /// Drop every table, continuing past individual failures.
    ///
    /// Ledger tables are dropped too; call [`SqliteStore::migrate`] before
    /// writing to the ledger again.
    pub fn clear_tables(&self) -> ClearReport {
        let mut report = ClearReport::default();

        let tables = match self.list_tables() {
            Ok(tables) => tables,
            Err(source) => {
                tracing::error!("Could not list tables to clear: {}", source);
                report.failures.push(CleanupError::ListTables(source));
                return report;
            }
        };

        for table in tables {
            match self.drop_table(&table) {
                Ok(()) => {
                    tracing::debug!("Dropped table {}", table);
                    report.dropped.push(table.as_str().to_string());
                }
                Err(source) => {
                    tracing::error!("Error when trying to drop table {}: {}", table, source);
                    report.failures.push(CleanupError::DropTable {
                        table: table.as_str().to_string(),
                        source,
                    });
                }
            }
        }

        report
    }
}
