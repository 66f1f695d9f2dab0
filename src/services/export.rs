//! Report export service
//!
//! Renders a parsed [`Report`] for people (text) or for other tools (JSON,
//! YAML).

use std::fmt::Write as _;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::{Report, Resource};

/// Export format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            "yaml" | "yml" => Ok(ExportFormat::Yaml),
            other => anyhow::bail!("Unknown export format '{}'. Expected text, json or yaml", other),
        }
    }
}

/// Export a report in the given format
pub fn export_report(report: &Report, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => {
            serde_json::to_string_pretty(report).context("Failed to serialize report to JSON")
        }
        ExportFormat::Yaml => {
            serde_norway::to_string(report).context("Failed to serialize report to YAML")
        }
        ExportFormat::Text => Ok(render_text(report)),
    }
}

fn render_text(report: &Report) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "Hostname    : {}", report.host);
    let _ = writeln!(out, "Environment : {}", report.environment);
    let _ = writeln!(out, "Reported    : {}", report.completed_at);
    let _ = writeln!(out, "State       : {}", report.state);
    let _ = writeln!(out, "Runtime     : {}", or_unknown(&report.runtime_seconds));
    let _ = writeln!(out, "Hash        : {}", report.content_hash);

    let _ = writeln!(out, "\nResources");
    let _ = writeln!(out, "\tTotal   : {}", or_unknown(&report.total_count));
    let _ = writeln!(out, "\tChanged : {}", or_unknown(&report.changed_count));
    let _ = writeln!(out, "\tFailed  : {}", or_unknown(&report.failed_count));
    let _ = writeln!(out, "\tSkipped : {}", or_unknown(&report.skipped_count));

    write_resources(&mut out, "Failed Resources", &report.resources_failed);
    write_resources(&mut out, "Changed Resources", &report.resources_changed);
    write_resources(&mut out, "Skipped Resources", &report.resources_skipped);

    if !report.log_messages.is_empty() {
        let _ = writeln!(out, "\nLog Messages");
        for line in &report.log_messages {
            let _ = writeln!(out, "\t{}", line);
        }
    }

    out
}

fn write_resources(out: &mut String, heading: &str, resources: &[Resource]) {
    if resources.is_empty() {
        return;
    }

    let _ = writeln!(out, "\n{}", heading);
    for resource in resources {
        let _ = writeln!(
            out,
            "\t{}[{}] {}:{}",
            resource.resource_type, resource.name, resource.file, resource.line
        );
    }
}

fn or_unknown(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}
