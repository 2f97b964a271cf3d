//! Resledger CLI - inspect the resource inventory ledger

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use resledger::config::{self, LedgerConfig};
use resledger::storage::{SqliteStore, StatusLedger, TableCatalog};
use resledger::query::{RowMaterializer, SummaryAggregator};
use resledger::ui::{self, Icons};
use resledger::{NewStatus, ResourceStatus};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "resledger")]
#[command(version)]
#[command(about = "Resource inventory ledger - per-execution resource counts, spend and status")]
#[command(long_about = r#"
Resledger reads the inventory written by resource collectors:
  • Executions (one per collector run)
  • Resource tables (one per resource kind, rows tagged with an execution)
  • The status ledger (latest state of every table per execution)

Example usage:
  resledger summary --execution 3
  resledger rows --table ec2_instances --execution 3 --format json
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the database file (overrides the config file)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List every table in the database
    Tables,

    /// List collector executions
    Executions,

    /// Start a new execution
    Begin {
        /// Execution name
        #[arg(short, long)]
        name: String,
    },

    /// Show the rows a resource table holds for an execution
    Rows {
        /// Resource table name
        #[arg(short, long)]
        table: String,

        /// Execution id
        #[arg(short, long)]
        execution: i64,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Summarize resource counts, spend and status per execution
    Summary {
        /// Only show this execution
        #[arg(short, long)]
        execution: Option<i64>,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Append a status record for a resource table
    Status {
        /// Resource table name
        #[arg(short, long)]
        table: String,

        /// Execution id
        #[arg(short, long)]
        execution: i64,

        /// fetching, error or finished
        #[arg(short, long)]
        status: ResourceStatus,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Drop every table (best effort)
    Clear,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = config::load_config(cli.config.as_deref())?.unwrap_or_default();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(settings.log_level())
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let database = cli.database.clone().unwrap_or_else(|| settings.database_path());
    config::ensure_db_dir(&database)?;
    let store = SqliteStore::open(&database)?;

    run(cli.command, &store, &settings)
}

fn run(command: Commands, store: &SqliteStore, settings: &LedgerConfig) -> anyhow::Result<()> {
    match command {
        Commands::Tables => {
            let tables = TableCatalog::new(store).list_tables()?;
            if tables.is_empty() {
                ui::empty("No tables found.");
            } else {
                ui::section(Icons::DATABASE, "Tables");
                for table in tables {
                    println!("  {}", table);
                }
            }
        }

        Commands::Executions => {
            let executions = store.list_executions()?;
            if executions.is_empty() {
                ui::empty("No executions recorded.");
            } else {
                println!("{}", ui::executions_table(&executions));
            }
        }

        Commands::Begin { name } => {
            let execution = store.create_execution(&name)?;
            ui::success(&format!("Started execution {} ({})", execution.id(), execution.name));
        }

        Commands::Rows { table, execution, format } => {
            let table = TableCatalog::new(store).resolve(&table)?;
            let records = RowMaterializer::new(store).scan(&table, execution)?;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
                OutputFormat::Text if records.is_empty() => {
                    ui::empty(&format!("No rows in {} for execution {}.", table, execution));
                }
                OutputFormat::Text => {
                    ui::section(Icons::DATABASE, &format!("{} (execution {})", table, execution));
                    println!("{}", ui::records_table(&records));
                }
            }
        }

        Commands::Summary { execution, format } => {
            let aggregator = SummaryAggregator::new(store).with_spend_column(settings.spend_column());
            let mut summary = aggregator.summarize()?;
            if let Some(id) = execution {
                summary.retain(|execution_id, _| *execution_id == id);
            }

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
                OutputFormat::Text if summary.is_empty() => ui::empty("No status records found."),
                OutputFormat::Text => {
                    for (execution_id, entries) in &summary {
                        let spent: f64 = entries.iter().map(|s| s.total_spent).sum();
                        ui::section(
                            Icons::STATS,
                            &format!("Execution {} - {:.2} / month", execution_id, spent),
                        );
                        println!("{}", ui::summary_table(entries));
                    }
                }
            }
        }

        Commands::Status { table, execution, status, description } => {
            let record = StatusLedger::new(store)
                .append(&NewStatus::new(table, execution, status, description))?;
            ui::success(&format!(
                "Recorded {} for {} (execution {}, record {})",
                record.status,
                record.table_name,
                record.execution_id,
                record.id()
            ));
        }

        Commands::Clear => {
            let report = TableCatalog::new(store).clear_tables();
            for table in &report.dropped {
                println!("{} {}", Icons::DEL, table);
            }
            if report.is_clean() {
                ui::success(&format!("Dropped {} tables", report.dropped.len()));
            } else {
                for failure in &report.failures {
                    ui::error(&failure.to_string());
                }
                ui::warn(&format!(
                    "Dropped {} tables, {} failures",
                    report.dropped.len(),
                    report.failures.len()
                ));
            }
        }
    }

    Ok(())
}
