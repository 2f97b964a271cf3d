//! Ledger entities - executions and resource status records
//!
//! Both entities are append-only rows that share the same audit fields
//! (`id`, `created_at`), composed in through [`AuditFields`].

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Identifier of one collector run.
pub type ExecutionId = i64;

/// Processing state of a resource table within one execution.
///
/// Persisted as its ordinal: `Fetching = 0`, `Error = 1`, `Finished = 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    /// Collector is still fetching resources for the table
    Fetching,
    /// Collection for the table failed
    Error,
    /// Collection for the table completed
    Finished,
}

impl ResourceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceStatus::Fetching => "fetching",
            ResourceStatus::Error => "error",
            ResourceStatus::Finished => "finished",
        }
    }

    /// Wire value stored in the ledger
    pub fn ordinal(&self) -> i64 {
        match self {
            ResourceStatus::Fetching => 0,
            ResourceStatus::Error => 1,
            ResourceStatus::Finished => 2,
        }
    }

    pub fn from_ordinal(ordinal: i64) -> Result<Self> {
        match ordinal {
            0 => Ok(ResourceStatus::Fetching),
            1 => Ok(ResourceStatus::Error),
            2 => Ok(ResourceStatus::Finished),
            other => Err(Error::InvalidStatus(other)),
        }
    }
}

impl FromStr for ResourceStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "fetching" | "fetch" | "0" => Ok(ResourceStatus::Fetching),
            "error" | "1" => Ok(ResourceStatus::Error),
            "finished" | "finish" | "2" => Ok(ResourceStatus::Finished),
            _ => Err(Error::UnknownStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fields assigned by the store when a row is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditFields {
    pub id: i64,
    pub created_at: DateTime<Utc>,
}

/// One collector run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    #[serde(flatten)]
    pub audit: AuditFields,
    pub name: String,
}

impl Execution {
    pub fn id(&self) -> ExecutionId {
        self.audit.id
    }
}

/// A status observation waiting to be appended to the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStatus {
    pub table_name: String,
    pub status: ResourceStatus,
    pub description: String,
    pub execution_id: ExecutionId,
}

impl NewStatus {
    pub fn new(
        table_name: impl Into<String>,
        execution_id: ExecutionId,
        status: ResourceStatus,
        description: impl Into<String>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            status,
            description: description.into(),
            execution_id,
        }
    }
}

/// A stored status observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    #[serde(flatten)]
    pub audit: AuditFields,
    pub table_name: String,
    pub status: ResourceStatus,
    pub description: String,
    pub execution_id: ExecutionId,
}

impl StatusRecord {
    pub fn id(&self) -> i64 {
        self.audit.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_match_wire_values() {
        assert_eq!(ResourceStatus::Fetching.ordinal(), 0);
        assert_eq!(ResourceStatus::Error.ordinal(), 1);
        assert_eq!(ResourceStatus::Finished.ordinal(), 2);

        for status in [ResourceStatus::Fetching, ResourceStatus::Error, ResourceStatus::Finished] {
            assert_eq!(ResourceStatus::from_ordinal(status.ordinal()).unwrap(), status);
        }
    }

    #[test]
    fn test_unknown_ordinal_is_rejected() {
        assert!(matches!(ResourceStatus::from_ordinal(3), Err(Error::InvalidStatus(3))));
    }

    #[test]
    fn test_parse_status() {
        assert_eq!("Finished".parse::<ResourceStatus>().unwrap(), ResourceStatus::Finished);
        assert_eq!("fetch".parse::<ResourceStatus>().unwrap(), ResourceStatus::Fetching);
        assert!("done".parse::<ResourceStatus>().is_err());
    }
}
