//! End-to-end CLI tests for the `tl` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn tl() -> Command {
    Command::cargo_bin("tl").expect("binary exists")
}

#[test]
fn init_then_seed_then_query() {
    let dir = TempDir::new().unwrap();

    tl().current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized tracklet workspace"));

    tl().current_dir(dir.path())
        .args(["seed", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"issues\": 20"));

    tl().current_dir(dir.path())
        .args(["call", "statuses.getAll"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"backlog\""))
        .stdout(predicate::str::contains("\"technical-review\""));
}

#[test]
fn init_twice_requires_force() {
    let dir = TempDir::new().unwrap();

    tl().current_dir(dir.path()).arg("init").assert().success();

    tl().current_dir(dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Already initialized"));

    tl().current_dir(dir.path())
        .args(["init", "--force"])
        .assert()
        .success();
}

#[test]
fn unknown_method_reports_structured_error() {
    let dir = TempDir::new().unwrap();
    tl().current_dir(dir.path()).arg("init").assert().success();

    // stdout is a pipe here, so errors come back as structured JSON.
    tl().current_dir(dir.path())
        .args(["call", "issues.destroyAll"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("METHOD_NOT_FOUND"));
}

#[test]
fn call_without_init_suggests_init() {
    let dir = TempDir::new().unwrap();

    tl().current_dir(dir.path())
        .args(["call", "statuses.getAll"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NOT_FOUND").not())
        .stderr(predicate::str::contains("tl init"));
}

#[test]
fn call_with_bad_params_json_fails_cleanly() {
    let dir = TempDir::new().unwrap();
    tl().current_dir(dir.path()).arg("init").assert().success();

    tl().current_dir(dir.path())
        .args(["call", "issues.updateStatus", "{not json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("INVALID_PARAMS"));
}

#[test]
fn mutation_through_the_cli_persists() {
    let dir = TempDir::new().unwrap();
    tl().current_dir(dir.path()).arg("init").assert().success();
    tl().current_dir(dir.path()).arg("seed").assert().success();

    tl().current_dir(dir.path())
        .args([
            "call",
            "issues.updateStatus",
            r#"{"issueId": 1, "statusId": "completed"}"#,
        ])
        .assert()
        .success();

    tl().current_dir(dir.path())
        .args(["call", "issues.getAll"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"completed\""));
}

#[test]
fn explicit_db_flag_bypasses_discovery() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("standalone.db");

    // No workspace anywhere near; --db alone is enough.
    tl().args(["--db", db.to_str().unwrap(), "call", "priorities.getAll"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"urgent\""));
}

#[test]
fn schema_lists_every_method() {
    tl().arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("issues.updateAssignee"))
        .stdout(predicate::str::contains("files.generateUserAvatarUploadUrl"));
}

#[test]
fn serve_answers_line_delimited_requests() {
    let dir = TempDir::new().unwrap();
    tl().current_dir(dir.path()).arg("init").assert().success();

    let assert = tl()
        .current_dir(dir.path())
        .arg("serve")
        .write_stdin(concat!(
            r#"{"id": 1, "method": "statuses.getAll"}"#,
            "\n",
            r#"{"id": 2, "method": "nope.nope"}"#,
            "\n",
        ))
        .assert()
        .success();

    let out = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let mut lines = out.lines();
    let first: serde_json::Value = serde_json::from_str(lines.next().unwrap()).unwrap();
    assert_eq!(first["id"], 1);
    assert_eq!(first["result"].as_array().unwrap().len(), 6);
    let second: serde_json::Value = serde_json::from_str(lines.next().unwrap()).unwrap();
    assert_eq!(second["error"]["code"], "METHOD_NOT_FOUND");
}
