//! Integration tests for CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn csv_merge(cwd: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("csv-merge"));
    cmd.current_dir(cwd).env_remove("RUST_LOG").env_remove("CSV_MERGE_CONFIG");
    cmd
}

fn scenario_dir() -> TempDir {
    let tmp = TempDir::new().expect("temp dir");
    let input = tmp.path().join("input");
    fs::create_dir(&input).expect("mkdir input");
    fs::write(input.join("a.csv"), "id,name\n1,Alice\n2,Bob").expect("write a.csv");
    fs::write(input.join("b.csv"), "id,name\n3,Carol").expect("write b.csv");
    tmp
}

#[test]
fn test_cli_version() {
    let tmp = TempDir::new().expect("temp dir");
    csv_merge(tmp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("csv-merge"));
}

#[test]
fn test_cli_help() {
    let tmp = TempDir::new().expect("temp dir");
    csv_merge(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Concatenate"))
        .stdout(predicate::str::contains("merge"))
        .stdout(predicate::str::contains("info"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_merge_requires_both_paths() {
    let tmp = TempDir::new().expect("temp dir");
    csv_merge(tmp.path())
        .args(["merge", "input"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("OUTPUT_FILE"));
}

#[test]
fn test_merge_default_settings() {
    let tmp = scenario_dir();
    csv_merge(tmp.path())
        .args(["merge", "input", "out.csv", "--line-ending", "lf"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully combined 2 files into out.csv"))
        .stdout(predicate::str::contains("a.csv: 2 rows"))
        .stdout(predicate::str::contains("b.csv: 1 row"));

    let written = fs::read_to_string(tmp.path().join("out.csv")).expect("read output");
    assert_eq!(written, "id,name\n1,Alice\n2,Bob\n3,Carol\n");
}

#[test]
fn test_merge_pipe_delimiter_quote_all() {
    let tmp = scenario_dir();
    csv_merge(tmp.path())
        .args(["merge", "input", "out.csv", "--output-delimiter=|", "--quote-all"])
        .args(["--line-ending", "lf"])
        .assert()
        .success();

    let written = fs::read_to_string(tmp.path().join("out.csv")).expect("read output");
    assert_eq!(written, "\"id\"|\"name\"\n\"1\"|\"Alice\"\n\"2\"|\"Bob\"\n\"3\"|\"Carol\"\n");
}

#[test]
fn test_merge_pipe_quoted_preset() {
    let tmp = scenario_dir();
    csv_merge(tmp.path())
        .args(["merge", "input", "out.csv", "--preset", "pipe-quoted", "--line-ending", "lf"])
        .assert()
        .success();

    let written = fs::read_to_string(tmp.path().join("out.csv")).expect("read output");
    assert!(written.starts_with("\"id\"|\"name\"\n"), "got: {written}");
}

#[test]
fn test_merge_no_csv_files_fails_without_output() {
    let tmp = TempDir::new().expect("temp dir");
    let input = tmp.path().join("input");
    fs::create_dir(&input).expect("mkdir input");
    fs::write(input.join("notes.txt"), "not a csv").expect("write notes");

    csv_merge(tmp.path())
        .args(["merge", "input", "out.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no files matching '*.csv'"));

    assert!(!tmp.path().join("out.csv").exists());
}

#[test]
fn test_merge_missing_directory_fails() {
    let tmp = TempDir::new().expect("temp dir");
    csv_merge(tmp.path())
        .args(["merge", "nowhere", "out.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read input directory"));
}

#[test]
fn test_merge_empty_file_names_offender() {
    let tmp = scenario_dir();
    fs::write(tmp.path().join("input").join("c.csv"), "").expect("write empty");

    csv_merge(tmp.path())
        .args(["merge", "input", "out.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("c.csv is empty"));
}

#[test]
fn test_merge_rejects_multi_character_delimiter() {
    let tmp = scenario_dir();
    csv_merge(tmp.path())
        .args(["merge", "input", "out.csv", "--delimiter", "::"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid delimiter"));

    assert!(!tmp.path().join("out.csv").exists());
}

#[test]
fn test_merge_rejects_unknown_encoding() {
    let tmp = scenario_dir();
    csv_merge(tmp.path())
        .args(["merge", "input", "out.csv", "--encoding=klingon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown encoding 'klingon'"));
}

#[test]
fn test_merge_latin1_round_trip() {
    let tmp = TempDir::new().expect("temp dir");
    let input = tmp.path().join("input");
    fs::create_dir(&input).expect("mkdir input");
    fs::write(input.join("a.csv"), b"city\nM\xfcnchen\n").expect("write a.csv");
    fs::write(input.join("b.csv"), b"city\nS\xe3o Paulo\n").expect("write b.csv");

    csv_merge(tmp.path())
        .args(["merge", "input", "out.csv", "--encoding=latin-1", "--line-ending", "lf"])
        .assert()
        .success();

    let written = fs::read(tmp.path().join("out.csv")).expect("read output");
    assert_eq!(written, b"city\nM\xfcnchen\nS\xe3o Paulo\n");
}

#[test]
fn test_merge_skip_bad_files_reports() {
    let tmp = scenario_dir();
    fs::write(tmp.path().join("input").join("c.csv"), "").expect("write empty");

    csv_merge(tmp.path())
        .args(["merge", "input", "out.csv", "--skip-bad-files"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped 1 file:"))
        .stdout(predicate::str::contains("c.csv"));
}

#[test]
fn test_merge_json_summary() {
    let tmp = scenario_dir();
    let output = csv_merge(tmp.path())
        .args(["merge", "input", "out.csv", "--format", "json"])
        .output()
        .expect("run csv-merge");
    assert!(output.status.success());

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).expect("parse json");
    assert_eq!(doc.get("data_rows").and_then(|v| v.as_u64()), Some(3));
    assert_eq!(doc.get("files").and_then(|v| v.as_array()).map(Vec::len), Some(2));
    assert_eq!(
        doc.get("header").and_then(|v| v.as_array()).map(|a| a.len()),
        Some(2),
        "header should have two fields"
    );
}

#[test]
fn test_merge_reads_config_file() {
    let tmp = TempDir::new().expect("temp dir");
    let input = tmp.path().join("input");
    fs::create_dir(&input).expect("mkdir input");
    fs::write(input.join("a.csv"), "id;name\n1;Alice\n").expect("write a.csv");
    fs::write(tmp.path().join("csv-merge.toml"), "delimiter = ';'\nline_ending = 'lf'\n")
        .expect("write config");

    csv_merge(tmp.path()).args(["merge", "input", "out.csv"]).assert().success();

    let written = fs::read_to_string(tmp.path().join("out.csv")).expect("read output");
    assert_eq!(written, "id;name\n1;Alice\n");
}

#[test]
fn test_merge_env_overrides_config_file() {
    let tmp = TempDir::new().expect("temp dir");
    let input = tmp.path().join("input");
    fs::create_dir(&input).expect("mkdir input");
    fs::write(input.join("a.csv"), "id,name\n1,Alice\n").expect("write a.csv");
    fs::write(tmp.path().join("csv-merge.toml"), "line_ending = 'crlf'\n").expect("write config");

    csv_merge(tmp.path())
        .env("CSV_MERGE_LINE_ENDING", "lf")
        .env("CSV_MERGE_QUOTE_ALL", "true")
        .args(["merge", "input", "out.csv"])
        .assert()
        .success();

    let written = fs::read_to_string(tmp.path().join("out.csv")).expect("read output");
    assert_eq!(written, "\"id\",\"name\"\n\"1\",\"Alice\"\n");
}

#[test]
fn test_rust_log_sets_log_level() {
    let tmp = scenario_dir();
    csv_merge(tmp.path())
        .env("RUST_LOG", "debug")
        .args(["merge", "input", "out.csv"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Discovered input"));
}

#[test]
fn test_default_log_level_hides_debug() {
    let tmp = scenario_dir();
    csv_merge(tmp.path())
        .args(["merge", "input", "out.csv"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Discovered input").not());
}

#[test]
fn test_merge_explicit_bad_config_fails() {
    let tmp = scenario_dir();
    fs::write(tmp.path().join("custom.toml"), "quote_all = 'maybe'\n").expect("write config");

    csv_merge(tmp.path())
        .args(["merge", "input", "out.csv", "--config", "custom.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid TOML config"));
}

#[test]
fn test_info_lists_files_in_merge_order() {
    let tmp = scenario_dir();
    fs::write(tmp.path().join("input").join("c.csv"), "id,label\n4,Dan\n").expect("write c.csv");

    csv_merge(tmp.path())
        .args(["info", "input"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Header: id, name"))
        .stdout(predicate::str::contains("a.csv: 2 fields"))
        .stdout(predicate::str::contains("c.csv: 2 fields (header differs from first file)"));

    assert!(!tmp.path().join("out.csv").exists());
}

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().expect("temp dir");
    csv_merge(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("csv-merge"));
}
