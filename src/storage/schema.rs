//! Ledger schema definitions

/// SQL to create the executions table
pub const CREATE_EXECUTIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS executions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL
)
"#;

/// SQL to create the resource status ledger
/// One row per status observation; never updated in place
pub const CREATE_RESOURCE_STATUS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS resource_status (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    table_name TEXT NOT NULL,
    status INTEGER NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    execution_id INTEGER NOT NULL REFERENCES executions(id),
    created_at TEXT NOT NULL
)
"#;

pub const EXECUTIONS_TABLE: &str = "executions";
pub const RESOURCE_STATUS_TABLE: &str = "resource_status";

/// Column every resource table carries
pub const EXECUTION_COLUMN: &str = "execution_id";

/// Default monetary column summed per resource table
pub const DEFAULT_SPEND_COLUMN: &str = "price_per_month";

/// Tables owned by the ledger rather than by collectors
pub const LEDGER_TABLES: &[&str] = &[EXECUTIONS_TABLE, RESOURCE_STATUS_TABLE];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    vec![CREATE_EXECUTIONS_TABLE, CREATE_RESOURCE_STATUS_TABLE]
}
