use owo_colors::OwoColorize;
use tabled::builder::Builder;
use tabled::{settings::Style, Table, Tabled};
use crate::query::Summary;
use crate::status::Execution;
use crate::ui::theme;
use crate::value::Record;

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Resource")]
    resource: String,
    #[tabled(rename = "Count")]
    count: usize,
    #[tabled(rename = "Spent / month")]
    spent: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Description")]
    description: String,
}

#[derive(Tabled)]
struct ExecutionRow {
    #[tabled(rename = "Id")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Created")]
    created: String,
}

pub fn summary_table(summaries: &[Summary]) -> String {
    let rows: Vec<SummaryRow> = summaries
        .iter()
        .map(|s| SummaryRow {
            resource: s.resource_name.clone(),
            count: s.resource_count,
            spent: format!("{:.2}", s.total_spent),
            status: s.status.style(theme().status(s.status)).to_string(),
            description: s.description.clone(),
        })
        .collect();

    Table::new(&rows).with(Style::rounded()).to_string()
}

pub fn executions_table(executions: &[Execution]) -> String {
    let rows: Vec<ExecutionRow> = executions
        .iter()
        .map(|e| ExecutionRow {
            id: e.id(),
            name: e.name.clone(),
            created: e.audit.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
        .collect();

    Table::new(&rows).with(Style::rounded()).to_string()
}

/// Render records with the column set of the first record
pub fn records_table(records: &[Record]) -> String {
    let Some(first) = records.first() else {
        return String::new();
    };

    let columns: Vec<String> = first.columns().map(str::to_string).collect();
    let mut builder = Builder::default();
    builder.push_record(columns.clone());
    for record in records {
        builder.push_record(columns.iter().map(|column| {
            record
                .get(column)
                .map(|value| value.to_string())
                .unwrap_or_default()
        }));
    }

    builder.build().with(Style::rounded()).to_string()
}
