//! Integration tests for the puppet-summary binary

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use crate::common::*;
use puppet_summary::content_hash;

/// Run the binary with the given arguments and stdin, isolated from any
/// configuration on the host
fn run_cli(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_puppet-summary"))
        .args(args)
        .env("PUPPET_SUMMARY_CONFIG", "/nonexistent/puppet-summary.yaml")
        .env_remove("RUST_LOG")
        .env_remove("PUPPET_SUMMARY_OUTPUT_FORMAT")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn puppet-summary");

    let mut input = child.stdin.take().expect("stdin is piped");
    input.write_all(stdin.as_bytes()).expect("failed to write stdin");
    drop(input);

    child.wait_with_output().expect("failed to wait for puppet-summary")
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("puppet-summary-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_parse_json_from_stdin() {
    let output = run_cli(&["parse", "--format", "json", "-"], ReportFixtures::changed());

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["host"], "web01.example.com");
    assert_eq!(report["state"], "changed");
    assert_eq!(report["content_hash"], content_hash(ReportFixtures::changed().as_bytes()));
}

#[test]
fn test_yaml_alias_runs_parse() {
    let output = run_cli(&["yaml", "--format", "yaml", "-"], ReportFixtures::changed());

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("---\n"));
    assert!(stdout.contains("host: web01.example.com"));
}

#[test]
fn test_parse_text_by_default() {
    let output = run_cli(&["parse", "-"], ReportFixtures::failed());

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Hostname    : db01.example.com"));
    assert!(stdout.contains("Failed Resources"));
    assert!(stdout.contains("Service[ntpd]"));
}

#[test]
fn test_parse_rejection_reports_error_body() {
    let doc = ReportDocumentBuilder::new().with_field("host", "evil;rm -rf").build();
    let output = run_cli(&["parse", "--format", "json", "-"], &doc);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("\"code\":\"security_validation\""));
}

#[test]
fn test_hash_matches_library() {
    let output = run_cli(&["hash", "-"], ReportFixtures::changed());

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        stdout.trim_end(),
        format!("{}  -", content_hash(ReportFixtures::changed().as_bytes()))
    );
}

#[test]
fn test_validate_counts_results() {
    let dir = temp_dir("validate");
    let good = dir.join("good.yaml");
    let bad = dir.join("bad.yaml");
    std::fs::write(&good, ReportFixtures::changed()).unwrap();
    std::fs::write(&bad, ReportDocumentBuilder::new().with_field("status", "bogus").build()).unwrap();

    let output = run_cli(
        &["validate", good.to_str().unwrap(), bad.to_str().unwrap()],
        "",
    );

    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.trim_end(), "1 valid, 1 invalid");

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_missing_file_is_an_error() {
    let output = run_cli(&["parse", "/nonexistent/report.yaml"], "");

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Failed to read report"));
}

#[test]
fn test_init_config_writes_defaults() {
    let dir = temp_dir("init-config");
    let path = dir.join("config.yaml");

    let output = run_cli(&["init-config", path.to_str().unwrap()], "");

    assert!(output.status.success());
    let config = puppet_summary::AppConfig::from_file(&path).unwrap();
    assert_eq!(config.logging.level, "info");

    std::fs::remove_dir_all(&dir).unwrap();
}
