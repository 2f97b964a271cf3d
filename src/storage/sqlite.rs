//! SQLite storage implementation

use std::path::Path;
use chrono::Utc;
use rusqlite::{Connection, params};
use crate::{Result, Error};
use crate::status::{AuditFields, Execution};
use super::schema;

/// SQLite-backed store shared by the catalog, ledger and query components.
///
/// Opened once at startup and handed to each component by reference; it is
/// never reopened implicitly.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        tracing::info!("Opening resource ledger at {}", path.display());
        Self::connect(&path.display().to_string(), || Connection::open(path))
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        Self::connect(":memory:", Connection::open_in_memory)
    }

    /// Any failure before the ledger schema is in place is a connectivity error
    fn connect<F>(path: &str, open: F) -> Result<Self>
    where
        F: FnOnce() -> rusqlite::Result<Connection>,
    {
        let conn = open()
            .and_then(|conn| {
                // `REFERENCES` clauses document relations only
                conn.pragma_update(None, "foreign_keys", false)?;
                create_schema(&conn)?;
                Ok(conn)
            })
            .map_err(|source| Error::Connectivity {
                path: path.to_string(),
                source,
            })?;
        Ok(Self { conn })
    }

    /// Create the ledger tables if they are missing
    pub fn migrate(&self) -> Result<()> {
        create_schema(&self.conn)?;
        Ok(())
    }

    /// Run trusted SQL (collector table DDL, fixtures)
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    // ========== Execution Operations ==========

    /// Record a new collector run
    pub fn create_execution(&self, name: &str) -> Result<Execution> {
        let created_at = Utc::now();
        self.conn.execute(
            "INSERT INTO executions (name, created_at) VALUES (?1, ?2)",
            params![name, created_at],
        )?;
        Ok(Execution {
            audit: AuditFields {
                id: self.conn.last_insert_rowid(),
                created_at,
            },
            name: name.to_string(),
        })
    }

    /// List all collector runs, oldest first
    pub fn list_executions(&self) -> Result<Vec<Execution>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at FROM executions ORDER BY id")?;

        let executions = stmt
            .query_map([], |row| {
                Ok(Execution {
                    audit: AuditFields {
                        id: row.get(0)?,
                        created_at: row.get(2)?,
                    },
                    name: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(executions)
    }
}

fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
    for stmt in schema::all_schema_statements() {
        conn.execute(stmt, [])?;
    }
    Ok(())
}
