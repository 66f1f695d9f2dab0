//! Step definitions that assemble the submitted document

use cucumber::given;
use serde_json::json;

use crate::common::{ReportDocumentBuilder, ReportFixtures, ResourceSpec};
use crate::features::ReportWorld;

#[given("a well-formed report")]
async fn well_formed_report(world: &mut ReportWorld) {
    world.document = ReportDocumentBuilder::new();
    world.raw_document = None;
}

#[given(expr = "the canned {string} report")]
async fn canned_report(world: &mut ReportWorld, name: String) {
    let raw = match name.as_str() {
        "changed" => ReportFixtures::changed(),
        "failed" => ReportFixtures::failed(),
        other => panic!("no canned report named {}", other),
    };
    world.raw_document = Some(raw.to_string());
}

#[given(expr = "the report field {string} is {string}")]
async fn report_field(world: &mut ReportWorld, field: String, value: String) {
    world.document = world.document.clone().with_field(&field, value);
}

#[given(expr = "the report has no {string} section")]
async fn report_without(world: &mut ReportWorld, field: String) {
    world.document = world.document.clone().without(&field);
}

#[given(expr = "the resource metrics are {string}")]
async fn resource_metrics(world: &mut ReportWorld, metrics: String) {
    let values = metrics.split(", ").map(|m| json!(m)).collect();
    world.document = world.document.clone().with_resource_values(values);
}

#[given(expr = "the time metrics are {string}")]
async fn time_metrics(world: &mut ReportWorld, metrics: String) {
    let values = metrics.split(", ").map(|m| json!(m)).collect();
    world.document = world.document.clone().with_time_values(values);
}

#[given(expr = "a log entry from {string} saying {string}")]
async fn log_entry(world: &mut ReportWorld, source: String, message: String) {
    world.document = world.document.clone().with_log(&source, &message);
}

#[given(expr = "a {word} resource {string} that is {string}")]
async fn resource(world: &mut ReportWorld, resource_type: String, title: String, flags: String) {
    let mut spec = ResourceSpec::new(&resource_type, &title);
    for flag in flags.split(" and ") {
        spec = match flag {
            "failed" => spec.failed(),
            "skipped" => spec.skipped(),
            "changed" => spec.changed(),
            "in sync" => spec,
            other => panic!("unknown resource flag {}", other),
        };
    }
    world.document = world.document.clone().with_resource(spec);
}
