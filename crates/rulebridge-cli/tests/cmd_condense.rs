//! Integration tests for `rulebridge condense`.
#![allow(clippy::expect_used)]

use std::io::Write as _;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use rulebridge_core::parse_report;

/// Path to the compiled `rulebridge` binary.
fn rulebridge_bin() -> PathBuf {
    let mut path = std::env::current_exe().expect("current exe");
    path.pop();
    if path.ends_with("deps") {
        path.pop();
    }
    path.push("rulebridge");
    path
}

/// Path to a shared fixture file.
fn fixture(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("../../tests/fixtures");
    path.push(name);
    path
}

#[test]
fn condense_fixture_collapses_shared_location() {
    let out = Command::new(rulebridge_bin())
        .arg("condense")
        .arg(fixture("basic-report.xml"))
        .output()
        .expect("run rulebridge condense");
    assert_eq!(
        out.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );

    let report = parse_report(&String::from_utf8_lossy(&out.stdout)).expect("parse");
    assert_eq!(report.defect_count(), 3);
    let parser = &report.rules[0].targets[0].defects[0];
    assert_eq!(
        parser.description,
        "Method has 12 branches.\nMethod is 140 logical instructions long."
    );
}

#[test]
fn condense_output_is_stable_when_repeated() {
    let first = Command::new(rulebridge_bin())
        .arg("condense")
        .arg(fixture("basic-report.xml"))
        .output()
        .expect("run rulebridge condense");

    let mut child = Command::new(rulebridge_bin())
        .args(["condense", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn rulebridge condense");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(&first.stdout)
        .expect("write stdin");
    let second = child.wait_with_output().expect("wait");
    assert_eq!(second.status.code(), Some(0));

    assert_eq!(
        parse_report(&String::from_utf8_lossy(&first.stdout)).expect("parse first"),
        parse_report(&String::from_utf8_lossy(&second.stdout)).expect("parse second")
    );
}

#[test]
fn condense_output_flag_writes_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = dir.path().join("condensed.xml");
    let out = Command::new(rulebridge_bin())
        .arg("condense")
        .arg(fixture("clean-report.xml"))
        .arg("-o")
        .arg(&output)
        .output()
        .expect("run rulebridge condense");
    assert_eq!(out.status.code(), Some(0));
    let text = std::fs::read_to_string(&output).expect("read output");
    assert!(parse_report(&text).expect("parse").is_clean());
}

#[test]
fn condense_missing_file_exits_2() {
    let out = Command::new(rulebridge_bin())
        .args(["condense", "/nonexistent/rulebridge/report.xml"])
        .output()
        .expect("run rulebridge condense");
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("file not found"));
}

#[test]
fn condense_truncated_report_exits_2() {
    let out = Command::new(rulebridge_bin())
        .arg("condense")
        .arg(fixture("truncated-report.xml"))
        .output()
        .expect("run rulebridge condense");
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("malformed report"));
}
