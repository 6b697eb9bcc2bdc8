//! Indexer status as reported by `GET /indexers/{name}/status`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status of a single indexer execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RunStatus {
    InProgress,
    Success,
    TransientFailure,
    PersistentFailure,
    Reset,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// Whether the execution has finished, successfully or not.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Success
                | RunStatus::TransientFailure
                | RunStatus::PersistentFailure
                | RunStatus::Reset
        )
    }

    /// The status as the service spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::InProgress => "inProgress",
            RunStatus::Success => "success",
            RunStatus::TransientFailure => "transientFailure",
            RunStatus::PersistentFailure => "persistentFailure",
            RunStatus::Reset => "reset",
            RunStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-document error reported by an indexer execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexerItemError {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub status_code: Option<u16>,
}

/// Result of one indexer execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexerExecution {
    pub status: RunStatus,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub items_processed: u64,
    #[serde(default)]
    pub items_failed: u64,
    #[serde(default)]
    pub errors: Vec<IndexerItemError>,
}

/// Indexer status document.
///
/// `status` is the overall indexer health (`running`, `error`, `unknown`).
/// `last_result` is absent until the first execution has been scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexerStatus {
    #[serde(default)]
    pub name: Option<String>,
    pub status: String,
    #[serde(default)]
    pub last_result: Option<IndexerExecution>,
}

impl IndexerStatus {
    /// Whether the service reports the indexer itself as broken.
    pub fn is_error(&self) -> bool {
        self.status.eq_ignore_ascii_case("error")
    }

    /// Status of the most recent execution, if any.
    pub fn last_run_status(&self) -> Option<RunStatus> {
        self.last_result.as_ref().map(|r| r.status)
    }
}
