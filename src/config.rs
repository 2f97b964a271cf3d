use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::storage::schema::DEFAULT_SPEND_COLUMN;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LedgerConfig {
    pub database: Option<String>,
    pub spend_column: Option<String>,
    pub log_level: Option<String>,
}

impl LedgerConfig {
    pub fn database_path(&self) -> PathBuf {
        self.database
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path)
    }

    pub fn spend_column(&self) -> &str {
        self.spend_column.as_deref().unwrap_or(DEFAULT_SPEND_COLUMN)
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("resledger.toml")
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from("resledger.db")
}

pub fn load_config(path: Option<&Path>) -> crate::Result<Option<LedgerConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: LedgerConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn ensure_db_dir(db_path: &Path) -> crate::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config(Some(&dir.path().join("absent.toml"))).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resledger.toml");
        std::fs::write(&path, "database = \"data/ledger.db\"\nspend_column = \"monthly_cost\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(config.database_path(), PathBuf::from("data/ledger.db"));
        assert_eq!(config.spend_column(), "monthly_cost");
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn test_defaults() {
        let config = LedgerConfig::default();
        assert_eq!(config.database_path(), PathBuf::from("resledger.db"));
        assert_eq!(config.spend_column(), "price_per_month");
    }

    #[test]
    fn test_invalid_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resledger.toml");
        std::fs::write(&path, "database = [").unwrap();

        assert!(matches!(load_config(Some(&path)), Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_ensure_db_dir() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested").join("ledger.db");

        ensure_db_dir(&db).unwrap();
        assert!(dir.path().join("nested").is_dir());
    }
}
