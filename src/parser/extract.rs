//! Field extractors
//!
//! Each extractor reads one part of the document and fills in its part of
//! the [`Report`]. They are kept small and independent so that the pipeline
//! in [`super::ReportParser`] is just a list of steps.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_norway::Value;
use tracing::{debug, warn};

use super::document::{flatten, render, Document, FlatMap};
use crate::models::{Report, ReportStatus, Resource};
use crate::utils::error::{ReportError, ReportResult};
use crate::utils::validation::{validate_environment, validate_host};

static TOTAL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"Total ([0-9.]+)").unwrap());
static FAILED_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"Failed ([0-9.]+)").unwrap());
static SKIPPED_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"Skipped ([0-9.]+)").unwrap());
static CHANGED_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"Changed ([0-9.]+)").unwrap());

/// Signature shared by every pipeline step
pub(crate) type Extractor = fn(&Document, &mut Report) -> ReportResult<()>;

/// A single entry of the `logs` sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogEntry {
    pub source: String,
    pub message: String,
}

impl LogEntry {
    fn from_flat(mut flat: FlatMap) -> Self {
        Self {
            source: flat.remove("source").unwrap_or_default(),
            message: flat.remove("message").unwrap_or_default(),
        }
    }

    /// The formatted log line, or `None` when there is no message
    pub fn line(&self) -> Option<String> {
        if self.message.is_empty() {
            None
        } else {
            Some(format!("{} : {}", self.source, self.message))
        }
    }
}

/// A single value of the `resource_statuses` mapping.
///
/// The flags are kept as the literal strings the agent reported; only
/// `"true"` and `"false"` carry meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceStatusEntry {
    pub title: String,
    pub resource_type: String,
    pub file: String,
    pub line: String,
    pub failed: String,
    pub skipped: String,
    pub changed: String,
}

impl ResourceStatusEntry {
    fn from_flat(mut flat: FlatMap) -> Self {
        let mut take = |key: &str| flat.remove(key).unwrap_or_default();
        Self {
            title: take("title"),
            resource_type: take("resource_type"),
            file: take("file"),
            line: take("line"),
            failed: take("failed"),
            skipped: take("skipped"),
            changed: take("changed"),
        }
    }

    fn resource(&self) -> Resource {
        Resource {
            name: self.title.clone(),
            resource_type: self.resource_type.clone(),
            file: self.file.clone(),
            line: self.line.clone(),
        }
    }

    fn is_ok(&self) -> bool {
        self.failed == "false" && self.skipped == "false" && self.changed == "false"
    }
}

pub(crate) fn extract_host(doc: &Document, out: &mut Report) -> ReportResult<()> {
    let host = doc.string("host")?;

    if !validate_host(host) {
        warn!(field = "host", value = ?host, "Submitted report failed security check");
        return Err(ReportError::SecurityValidation("host"));
    }

    out.host = host.to_string();
    Ok(())
}

pub(crate) fn extract_environment(doc: &Document, out: &mut Report) -> ReportResult<()> {
    let environment = doc.string("environment")?;

    if !validate_environment(environment) {
        warn!(field = "environment", value = ?environment, "Submitted report failed security check");
        return Err(ReportError::SecurityValidation("environment"));
    }

    out.environment = environment.to_string();
    Ok(())
}

/// The agent's timestamp is stored as-is, minus any single quotes wrapped
/// around it. Timezone and precision are left exactly as reported.
pub(crate) fn extract_time(doc: &Document, out: &mut Report) -> ReportResult<()> {
    out.completed_at = doc.string("time")?.replace('\'', "");
    Ok(())
}

pub(crate) fn extract_status(doc: &Document, out: &mut Report) -> ReportResult<()> {
    out.state = doc.string("status")?.parse::<ReportStatus>()?;
    Ok(())
}

pub(crate) fn extract_runtime(doc: &Document, out: &mut Report) -> ReportResult<()> {
    let values = rendered(doc.sequence("metrics.time.values")?);

    out.runtime_seconds = last_match(&values, &TOTAL_REGEX);
    if out.runtime_seconds.is_empty() {
        debug!("No total runtime reported");
    }
    Ok(())
}

pub(crate) fn extract_resource_counts(doc: &Document, out: &mut Report) -> ReportResult<()> {
    let values = rendered(doc.sequence("metrics.resources.values")?);

    out.total_count = last_match(&values, &TOTAL_REGEX);
    out.failed_count = last_match(&values, &FAILED_REGEX);
    out.skipped_count = last_match(&values, &SKIPPED_REGEX);
    out.changed_count = last_match(&values, &CHANGED_REGEX);
    Ok(())
}

pub(crate) fn extract_logs(doc: &Document, out: &mut Report) -> ReportResult<()> {
    let logs = doc.sequence("logs")?;

    out.log_messages = logs
        .iter()
        .map(|entry| LogEntry::from_flat(flatten(entry)))
        .filter_map(|entry| entry.line())
        .collect();

    debug!(
        kept = out.log_messages.len(),
        skipped = logs.len() - out.log_messages.len(),
        "Extracted log messages"
    );
    Ok(())
}

pub(crate) fn extract_resource_statuses(doc: &Document, out: &mut Report) -> ReportResult<()> {
    let statuses = doc.mapping("resource_statuses")?;

    let mut failed = Vec::new();
    let mut changed = Vec::new();
    let mut skipped = Vec::new();
    let mut ok = Vec::new();

    // Flags are checked independently; one resource may land in several lists.
    for (_, value) in statuses.iter() {
        let entry = ResourceStatusEntry::from_flat(flatten(value));

        if entry.skipped == "true" {
            skipped.push(entry.resource());
        }
        if entry.changed == "true" {
            changed.push(entry.resource());
        }
        if entry.failed == "true" {
            failed.push(entry.resource());
        }
        if entry.is_ok() {
            ok.push(entry.resource());
        }
    }

    debug!(
        failed = failed.len(),
        changed = changed.len(),
        skipped = skipped.len(),
        ok = ok.len(),
        "Classified resource statuses"
    );

    out.resources_failed = failed;
    out.resources_changed = changed;
    out.resources_skipped = skipped;
    out.resources_ok = ok;
    Ok(())
}

fn rendered(values: &[Value]) -> Vec<String> {
    values.iter().map(render).collect()
}

/// Scan every value and keep the capture of the last one that matches
fn last_match(values: &[String], pattern: &Regex) -> String {
    values
        .iter()
        .filter_map(|value| pattern.captures(value))
        .last()
        .map(|caps| caps[1].to_string())
        .unwrap_or_default()
}
