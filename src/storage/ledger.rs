//! Status ledger - append-only status observations per resource table
//!
//! A collector appends a record every time a table's state changes within an
//! execution. The current state of a (table, execution) pair is the record
//! with the highest id; older records stay for audit.

use chrono::Utc;
use rusqlite::params;
use crate::Result;
use crate::status::{AuditFields, ExecutionId, NewStatus, ResourceStatus, StatusRecord};
use super::sqlite::SqliteStore;

const SELECT_COLUMNS: &str =
    "SELECT id, table_name, status, description, execution_id, created_at FROM resource_status";

pub struct StatusLedger<'a> {
    store: &'a SqliteStore,
}

impl<'a> StatusLedger<'a> {
    pub fn new(store: &'a SqliteStore) -> Self {
        Self { store }
    }

    /// Append a status observation and return it as stored
    pub fn append(&self, entry: &NewStatus) -> Result<StatusRecord> {
        let created_at = Utc::now();
        let conn = self.store.conn();
        conn.execute(
            r#"
            INSERT INTO resource_status (table_name, status, description, execution_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                entry.table_name,
                entry.status.ordinal(),
                entry.description,
                entry.execution_id,
                created_at,
            ],
        )?;

        Ok(StatusRecord {
            audit: AuditFields {
                id: conn.last_insert_rowid(),
                created_at,
            },
            table_name: entry.table_name.clone(),
            status: entry.status,
            description: entry.description.clone(),
            execution_id: entry.execution_id,
        })
    }

    /// Latest record for every (table, execution) pair across all executions,
    /// in ascending id order
    pub fn latest_per_table_and_execution(&self) -> Result<Vec<StatusRecord>> {
        let sql = format!(
            "{SELECT_COLUMNS} WHERE id IN (SELECT MAX(id) FROM resource_status GROUP BY table_name, execution_id) ORDER BY id"
        );
        self.collect(&sql, [])
    }

    /// Every record for one pair, oldest first
    pub fn history(&self, table_name: &str, execution_id: ExecutionId) -> Result<Vec<StatusRecord>> {
        let sql = format!("{SELECT_COLUMNS} WHERE table_name = ?1 AND execution_id = ?2 ORDER BY id");
        self.collect(&sql, params![table_name, execution_id])
    }

    fn collect<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<StatusRecord>> {
        let mut stmt = self.store.conn().prepare(sql)?;
        let records = stmt
            .query_map(params, row_to_status)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }
}

fn row_to_status(row: &rusqlite::Row) -> rusqlite::Result<StatusRecord> {
    let ordinal: i64 = row.get(2)?;
    let status = ResourceStatus::from_ordinal(ordinal).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Integer, Box::new(e))
    })?;

    Ok(StatusRecord {
        audit: AuditFields {
            id: row.get(0)?,
            created_at: row.get(5)?,
        },
        table_name: row.get(1)?,
        status,
        description: row.get(3)?,
        execution_id: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_status_wins() {
        let store = SqliteStore::open_in_memory().unwrap();
        let execution = store.create_execution("run").unwrap().id();
        let ledger = StatusLedger::new(&store);

        let first = ledger
            .append(&NewStatus::new("ec2", execution, ResourceStatus::Fetching, ""))
            .unwrap();
        let last = ledger
            .append(&NewStatus::new("ec2", execution, ResourceStatus::Finished, "ok"))
            .unwrap();
        assert!(last.id() > first.id());

        let latest = ledger.latest_per_table_and_execution().unwrap();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].id(), last.id());
        assert_eq!(latest[0].status, ResourceStatus::Finished);
        assert_eq!(latest[0].description, "ok");
    }

    #[test]
    fn test_latest_is_per_pair_across_executions() {
        let store = SqliteStore::open_in_memory().unwrap();
        let a = store.create_execution("a").unwrap().id();
        let b = store.create_execution("b").unwrap().id();
        let ledger = StatusLedger::new(&store);

        ledger.append(&NewStatus::new("ec2", a, ResourceStatus::Fetching, "")).unwrap();
        ledger.append(&NewStatus::new("ec2", b, ResourceStatus::Fetching, "")).unwrap();
        ledger.append(&NewStatus::new("rds", a, ResourceStatus::Fetching, "")).unwrap();
        ledger.append(&NewStatus::new("ec2", a, ResourceStatus::Error, "throttled")).unwrap();
        ledger.append(&NewStatus::new("rds", a, ResourceStatus::Finished, "")).unwrap();

        let latest = ledger.latest_per_table_and_execution().unwrap();
        let pairs: Vec<(&str, ExecutionId, ResourceStatus)> = latest
            .iter()
            .map(|r| (r.table_name.as_str(), r.execution_id, r.status))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("ec2", b, ResourceStatus::Fetching),
                ("ec2", a, ResourceStatus::Error),
                ("rds", a, ResourceStatus::Finished),
            ]
        );
    }

    #[test]
    fn test_history_keeps_every_record() {
        let store = SqliteStore::open_in_memory().unwrap();
        let execution = store.create_execution("run").unwrap().id();
        let ledger = StatusLedger::new(&store);

        ledger.append(&NewStatus::new("ec2", execution, ResourceStatus::Fetching, "")).unwrap();
        ledger.append(&NewStatus::new("ec2", execution, ResourceStatus::Finished, "done")).unwrap();

        let history = ledger.history("ec2", execution).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].status, ResourceStatus::Fetching);
        assert_eq!(history[1].status, ResourceStatus::Finished);
    }

    #[test]
    fn test_append_without_execution_row() {
        let store = SqliteStore::open_in_memory().unwrap();
        let ledger = StatusLedger::new(&store);

        let record = ledger
            .append(&NewStatus::new("ec2", 7, ResourceStatus::Fetching, ""))
            .unwrap();
        assert_eq!(record.execution_id, 7);
        assert_eq!(ledger.history("ec2", 7).unwrap().len(), 1);
    }

    #[test]
    fn test_corrupt_status_fails_lookup() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .execute_batch(
                "INSERT INTO resource_status (table_name, status, description, execution_id, created_at)
                 VALUES ('ec2', 9, '', 1, '2024-01-01 00:00:00+00:00')",
            )
            .unwrap();

        let err = StatusLedger::new(&store).latest_per_table_and_execution().unwrap_err();
        assert!(err.is_query_failure());
    }
}
