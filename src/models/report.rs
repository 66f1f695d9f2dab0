//! Report data model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::utils::error::ReportError;

/// A resource declared in a Puppet manifest, along with the file and
/// line it was defined on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Resource {
    /// Resource title
    pub name: String,

    /// Resource type (e.g., "File", "Package")
    #[serde(rename = "type")]
    pub resource_type: String,

    /// Manifest the resource was declared in
    pub file: String,

    /// Line number within the manifest, as reported by the agent
    pub line: String,
}

/// Summary of a single Puppet run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Report {
    /// FQDN of the node
    pub host: String,

    /// Environment the node ran in
    pub environment: String,

    /// Outcome of the run
    pub state: ReportStatus,

    /// Completion time, copied from the agent without reformatting
    pub completed_at: String,

    /// Wall-clock duration of the run, in seconds
    pub runtime_seconds: String,

    // Counts stay as strings: the agent's numbers are passed through
    // untouched and empty means "not reported".
    pub total_count: String,
    pub changed_count: String,
    pub failed_count: String,
    pub skipped_count: String,

    /// Log lines formatted as "source : message", in document order
    pub log_messages: Vec<String>,

    /// Resources which failed, changed, were skipped, or were in sync.
    ///
    /// A resource lands in every bucket whose flag is set, so the first
    /// three lists may overlap.
    pub resources_failed: Vec<Resource>,
    pub resources_changed: Vec<Resource>,
    pub resources_skipped: Vec<Resource>,
    pub resources_ok: Vec<Resource>,

    /// Hex-encoded SHA-1 of the submitted document
    pub content_hash: String,
}

/// Report status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    #[default]
    Changed,
    Unchanged,
    Failed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Changed => "changed",
            ReportStatus::Unchanged => "unchanged",
            ReportStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "changed" => Ok(ReportStatus::Changed),
            "unchanged" => Ok(ReportStatus::Unchanged),
            "failed" => Ok(ReportStatus::Failed),
            other => Err(ReportError::InvalidEnum {
                field: "status",
                value: other.to_string(),
            }),
        }
    }
}
