//! End-to-end tests for the `infercon` binary.

use std::io::Write;
use std::process::{Command, Output};

use serde_json::json;

fn infercon(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_infercon"))
        .args(args)
        .env_remove("INFERCON_LOG")
        .env_remove("INFERCON_MAX_DEPTH")
        .output()
        .expect("failed to run infercon")
}

fn parameter(start: u32, end: u32, name: &str, method: u32) -> serde_json::Value {
    json!({
        "range": {"start": start, "end": end},
        "kind": {"reference": {"name": name, "symbol": {"parameter": {"method": method, "index": 0}}}}
    })
}

fn call(start: u32, end: u32, name: &str, target: u32, argument: serde_json::Value) -> serde_json::Value {
    json!({
        "range": {"start": start, "end": end},
        "kind": {"call": {"name": name, "target": target, "arguments": [argument]}}
    })
}

/// `checked(value)` returns `requireNonNull(value)`; `isPresent(s)` returns
/// `!isBlank(s)`.
fn session_file() -> tempfile::NamedTempFile {
    let session = json!({
        "methods": [
            {"id": 1, "name": "requireNonNull", "params": ["obj"], "contract": "null -> fail", "never_null": true},
            {
                "id": 2, "name": "checked", "params": ["value"],
                "body": {"expressions": [call(7, 29, "requireNonNull", 1, parameter(22, 27, "value", 2))]},
                "pre_contracts": [{"delegation": {"call": {"start": 7, "end": 29}}}]
            },
            {"id": 3, "name": "isBlank", "params": ["s"], "contract": "null -> true"},
            {
                "id": 4, "name": "isPresent", "params": ["s"],
                "body": {"expressions": [call(8, 18, "isBlank", 3, parameter(16, 17, "s", 4))]},
                "pre_contracts": [{"delegation": {"call": {"start": 8, "end": 18}, "negated": true}}]
            }
        ]
    });
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(session.to_string().as_bytes()).unwrap();
    file
}

#[test]
fn infer_prints_text_report() {
    let file = session_file();
    let out = infercon(&["infer", "--input", file.path().to_str().unwrap(), "--format", "text"]);
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "requireNonNull: null -> fail",
            "checked: null -> fail; !null -> !null",
            "isBlank: null -> true",
            "isPresent: null -> false",
        ]
    );
}

#[test]
fn infer_prints_json_for_one_method() {
    let file = session_file();
    let out = infercon(&["infer", "-i", file.path().to_str().unwrap(), "--method", "checked"]);
    assert!(out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(
        report,
        json!([{"method": "checked", "contracts": ["null -> fail", "!null -> !null"]}])
    );
}

#[test]
fn infer_reports_unknown_method_and_missing_file() {
    let file = session_file();
    let out = infercon(&["infer", "-i", file.path().to_str().unwrap(), "-m", "nope"]);
    assert_eq!(out.status.code(), Some(1));

    let out = infercon(&["infer", "-i", "/definitely/not/here.json"]);
    assert_eq!(out.status.code(), Some(3));
}

#[test]
fn normalize_narrows_fallback_clause() {
    let out = infercon(&["normalize", "--params", "1", "null -> fail", "_ -> !null"]);
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap().trim(), "null -> fail; !null -> !null");
}

#[test]
fn normalize_reports_conflicts_and_bad_text() {
    let out = infercon(&["normalize", "-p", "2", "null, _ -> fail", "_, null -> true"]);
    assert_eq!(out.status.code(), Some(2));

    let out = infercon(&["normalize", "-p", "1", "null, _ -> fail"]);
    assert_eq!(out.status.code(), Some(1));
}
