//! Table identifiers and per-table query building
//!
//! Resource tables are named at runtime, so their names end up inside SQL
//! text instead of being bound as parameters. A [`TableName`] can only be
//! produced by the [`TableCatalog`](super::TableCatalog), which guarantees the
//! table exists; [`TableQuery`] quotes it and binds `execution_id` as `?1`.

use super::schema::EXECUTION_COLUMN;

/// Name of a table known to the catalog.
///
/// Holds the spelling stored in `sqlite_master`. Lookups by external name
/// (`TableCatalog::resolve`, ledger entries in summaries) ignore ASCII case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableName(String);

impl TableName {
    pub(crate) fn from_catalog(name: String) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TableName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Quote an SQL identifier, doubling embedded quotes.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Builds statements over one resource table filtered by execution.
pub struct TableQuery<'t> {
    table: &'t TableName,
}

impl<'t> TableQuery<'t> {
    pub fn new(table: &'t TableName) -> Self {
        Self { table }
    }

    /// Every column of every row in the execution
    pub fn select_rows(&self) -> String {
        format!(
            "SELECT * FROM {} WHERE {} = ?1",
            quote_ident(self.table.as_str()),
            quote_ident(EXECUTION_COLUMN)
        )
    }

    pub fn count_rows(&self) -> String {
        format!(
            "SELECT COUNT(*) FROM {} WHERE {} = ?1",
            quote_ident(self.table.as_str()),
            quote_ident(EXECUTION_COLUMN)
        )
    }

    /// Sum of `column`; NULL when the execution has no rows
    pub fn sum_column(&self, column: &str) -> String {
        format!(
            "SELECT SUM({}) FROM {} WHERE {} = ?1",
            quote_ident(column),
            quote_ident(self.table.as_str()),
            quote_ident(EXECUTION_COLUMN)
        )
    }

    pub fn drop_table(&self) -> String {
        format!("DROP TABLE IF EXISTS {}", quote_ident(self.table.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("ec2_instances"), "\"ec2_instances\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn test_table_query_binds_execution() {
        let table = TableName::from_catalog("lambda".to_string());
        let query = TableQuery::new(&table);

        assert_eq!(
            query.select_rows(),
            "SELECT * FROM \"lambda\" WHERE \"execution_id\" = ?1"
        );
        assert_eq!(
            query.count_rows(),
            "SELECT COUNT(*) FROM \"lambda\" WHERE \"execution_id\" = ?1"
        );
        assert_eq!(
            query.sum_column("price_per_month"),
            "SELECT SUM(\"price_per_month\") FROM \"lambda\" WHERE \"execution_id\" = ?1"
        );
    }
}
