pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{empty, error, section, success, warn};
pub use table::{executions_table, records_table, summary_table};
pub use theme::{theme, Theme};
