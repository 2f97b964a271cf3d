//! Row materialization for schema-unknown resource tables

use crate::Result;
use crate::status::ExecutionId;
use crate::storage::{SqliteStore, TableName, TableQuery};
use crate::value::{Record, coerce};

/// Reads every column of a resource table into [`Record`]s.
pub struct RowMaterializer<'a> {
    store: &'a SqliteStore,
}

impl<'a> RowMaterializer<'a> {
    pub fn new(store: &'a SqliteStore) -> Self {
        Self { store }
    }

    /// All rows of `table` belonging to `execution_id`.
    ///
    /// Fails without returning any rows if the table cannot be queried or a
    /// row cannot be read.
    pub fn scan(&self, table: &TableName, execution_id: ExecutionId) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        self.scan_with(table, execution_id, |record| records.push(record))?;
        Ok(records)
    }

    /// Stream rows one at a time to `visit`, returning how many were visited.
    ///
    /// Rows are read lazily from a single pass over the table. On error the
    /// rows already visited are not rolled back; callers that need all or
    /// nothing should use [`scan`](Self::scan).
    pub fn scan_with<F>(&self, table: &TableName, execution_id: ExecutionId, mut visit: F) -> Result<usize>
    where
        F: FnMut(Record),
    {
        let sql = TableQuery::new(table).select_rows();
        tracing::debug!(table = %table, execution_id, "Scanning resource table");

        let mut stmt = self.store.conn().prepare(&sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt.query([execution_id])?;
        let mut visited = 0;
        while let Some(row) = rows.next()? {
            let mut record = Record::with_capacity(columns.len());
            for (idx, column) in columns.iter().enumerate() {
                record.insert(column.as_str(), coerce(row.get_ref(idx)?));
            }
            visit(record);
            visited += 1;
        }

        Ok(visited)
    }
}
