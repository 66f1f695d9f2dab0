//! Puppet report parser
//!
//! This module is the only place that reads the YAML an agent submits. A
//! parse either yields a fully validated [`Report`] or a [`ReportError`]
//! describing the first problem found; there is no partial output.
//!
//! The work is split into a fixed sequence of extractors:
//!
//!  * host and environment (whitelisted, they end up in paths)
//!  * completion time and run status
//!  * runtime and resource-count metrics
//!  * log messages
//!  * per-resource statuses

mod document;
mod extract;

use sha1::{Digest, Sha1};
use tracing::debug;

use crate::models::Report;
use crate::utils::error::ReportResult;

pub use document::{flatten, render, Document, FlatMap};
pub use extract::{LogEntry, ResourceStatusEntry};

use extract::Extractor;

/// Extraction steps, in the order they run
const PIPELINE: [(&str, Extractor); 8] = [
    ("host", extract::extract_host),
    ("environment", extract::extract_environment),
    ("time", extract::extract_time),
    ("status", extract::extract_status),
    ("runtime", extract::extract_runtime),
    ("resource_counts", extract::extract_resource_counts),
    ("logs", extract::extract_logs),
    ("resource_statuses", extract::extract_resource_statuses),
];

/// Parser turning submitted report bytes into a [`Report`].
///
/// Holds no state, so one instance can be shared freely between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportParser;

impl ReportParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self
    }

    /// Parse a submitted report
    pub fn parse(&self, content: &[u8]) -> ReportResult<Report> {
        let mut report = Report {
            content_hash: content_hash(content),
            ..Default::default()
        };

        let doc = Document::decode(content).inspect_err(|err| {
            debug!(hash = %report.content_hash, error = %err, "Failed to decode report");
        })?;

        for (step, extractor) in PIPELINE {
            extractor(&doc, &mut report).inspect_err(|err| {
                debug!(step, hash = %report.content_hash, error = %err, "Report rejected");
            })?;
        }

        debug!(
            host = %report.host,
            environment = %report.environment,
            state = %report.state,
            hash = %report.content_hash,
            "Parsed report"
        );

        Ok(report)
    }
}

/// Parse a submitted report with a default [`ReportParser`]
pub fn parse_report(content: &[u8]) -> ReportResult<Report> {
    ReportParser::new().parse(content)
}

/// Hex-encoded SHA-1 of the raw report bytes.
///
/// Used by storage as the report's file name and to spot duplicate
/// submissions.
pub fn content_hash(content: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}
