//! Summary aggregation
//!
//! Combines the latest status of every (table, execution) pair with a row
//! count and a spend total read from the named resource table:
//!
//! 1. latest status records across all executions (status ledger)
//! 2. per record: `COUNT(*)` and, when the table has the spend column,
//!    `SUM(spend)` over rows of that execution
//! 3. summaries grouped by execution id
//!
//! Any failing lookup or query aborts the whole aggregation.

use std::collections::{BTreeMap, HashMap};
use serde::{Deserialize, Serialize};
use crate::{Error, Result};
use crate::status::{ExecutionId, ResourceStatus};
use crate::storage::schema::DEFAULT_SPEND_COLUMN;
use crate::storage::{SqliteStore, StatusLedger, TableCatalog, TableName, TableQuery};

/// Inventory figures for one resource table within one execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Summary {
    pub resource_name: String,
    pub resource_count: usize,
    pub total_spent: f64,
    pub status: ResourceStatus,
    pub description: String,
}

/// Summaries keyed by execution id
pub type SummaryMap = BTreeMap<ExecutionId, Vec<Summary>>;

pub struct SummaryAggregator<'a> {
    store: &'a SqliteStore,
    spend_column: String,
}

impl<'a> SummaryAggregator<'a> {
    pub fn new(store: &'a SqliteStore) -> Self {
        Self {
            store,
            spend_column: DEFAULT_SPEND_COLUMN.to_string(),
        }
    }

    /// Use a different monetary column than `price_per_month`
    pub fn with_spend_column(mut self, column: impl Into<String>) -> Self {
        self.spend_column = column.into();
        self
    }

    pub fn spend_column(&self) -> &str {
        &self.spend_column
    }

    /// Summaries for every execution with at least one status record.
    pub fn summarize(&self) -> Result<SummaryMap> {
        let latest = StatusLedger::new(self.store).latest_per_table_and_execution()?;
        let catalog = TableCatalog::new(self.store);

        // SQLite identifiers ignore ASCII case
        let known: HashMap<String, TableName> = catalog
            .list_tables()?
            .into_iter()
            .map(|t| (t.as_str().to_ascii_lowercase(), t))
            .collect();
        let mut spend_tracked: HashMap<&str, bool> = HashMap::new();

        let mut summary = SummaryMap::new();
        for record in &latest {
            let table = known
                .get(&record.table_name.to_ascii_lowercase())
                .ok_or_else(|| Error::UnknownTable(record.table_name.clone()))?;

            let has_spend = match spend_tracked.get(table.as_str()).copied() {
                Some(has) => has,
                None => {
                    let has = catalog.has_column(table, &self.spend_column)?;
                    spend_tracked.insert(table.as_str(), has);
                    has
                }
            };

            let resource_count = self.count_rows(table, record.execution_id)?;
            let total_spent = if has_spend {
                self.sum_spend(table, record.execution_id)?
            } else {
                0.0
            };

            summary.entry(record.execution_id).or_default().push(Summary {
                resource_name: record.table_name.clone(),
                resource_count,
                total_spent,
                status: record.status,
                description: record.description.clone(),
            });
        }

        Ok(summary)
    }

    /// Summaries for one execution; computed over the whole ledger and then
    /// filtered, so the result matches `summarize()[execution_id]`
    pub fn summarize_execution(&self, execution_id: ExecutionId) -> Result<Vec<Summary>> {
        let mut summary = self.summarize()?;
        Ok(summary.remove(&execution_id).unwrap_or_default())
    }

    fn count_rows(&self, table: &TableName, execution_id: ExecutionId) -> Result<usize> {
        let sql = TableQuery::new(table).count_rows();
        tracing::debug!(table = %table, execution_id, "Counting resources");
        let count: i64 = self.store.conn().query_row(&sql, [execution_id], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn sum_spend(&self, table: &TableName, execution_id: ExecutionId) -> Result<f64> {
        let sql = TableQuery::new(table).sum_column(&self.spend_column);
        tracing::debug!(table = %table, execution_id, column = %self.spend_column, "Summing spend");
        let total: Option<f64> = self.store.conn().query_row(&sql, [execution_id], |row| row.get(0))?;
        Ok(total.unwrap_or(0.0))
    }
}
