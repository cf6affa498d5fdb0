//! CLI integration tests for quill-replay

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Command isolated from any user config
fn replay(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("quill-replay").unwrap();
    cmd.env("QUILL_CONFIG", dir.path().join("missing.toml"))
        .env_remove("RUST_LOG");
    cmd
}

const THREE_EMPTY_OPTIONS: &str = "{\"type\":\"INIT_POLL\",\"payload\":[\
    {\"_id\":\"a\",\"option\":\"\"},\
    {\"_id\":\"b\",\"option\":\"\"},\
    {\"_id\":\"c\",\"option\":\"\"}]}\n";

fn report(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).unwrap()
}

#[test]
fn test_help_lists_exit_codes() {
    let dir = TempDir::new().unwrap();
    replay(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("EXIT CODES"));
}

#[test]
fn test_replay_from_stdin_text_output() {
    let dir = TempDir::new().unwrap();
    let initial = dir.path().join("draft.json");
    fs::write(&initial, r#"{"title": ""}"#).unwrap();

    replay(&dir)
        .arg("--initial")
        .arg(&initial)
        .write_stdin("{\"type\":\"SET_TITLE\",\"payload\":\"Hello\"}\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Title: Hello"))
        .stdout(predicate::str::contains("Applied 1 actions, 1 changed"));
}

#[test]
fn test_json_report_for_poll_scenario() {
    let dir = TempDir::new().unwrap();
    let initial = dir.path().join("draft.json");
    fs::write(
        &initial,
        r#"{"polls": [
            {"_id": "A", "option": "a", "votes": []},
            {"_id": "B", "option": "b", "votes": []},
            {"_id": "C", "option": "c", "votes": []}
        ]}"#,
    )
    .unwrap();
    let actions = dir.path().join("actions.jsonl");
    fs::write(
        &actions,
        "{\"type\":\"REMOVE_POLL\",\"payload\":\"B\"}\n\
         {\"type\":\"REMOVE_POLL\",\"payload\":\"A\"}\n",
    )
    .unwrap();

    let output = replay(&dir)
        .arg(&actions)
        .arg("--initial")
        .arg(&initial)
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report = report(&output.stdout);
    let ids: Vec<&str> = report["document"]["polls"]
        .as_array()
        .unwrap()
        .iter()
        .map(|poll| poll["_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["A", "C"]);
    assert_eq!(report["applied"], 2);
    assert_eq!(report["changed"], 1);
    assert_eq!(report["polls_editable"], true);
}

#[test]
fn test_json_report_layout_for_comment_density() {
    let dir = TempDir::new().unwrap();
    let initial = dir.path().join("draft.json");
    fs::write(
        &initial,
        r#"{"attachments": [
            {"_id": "g", "fileName": "cat", "fileType": "gif", "url": "https://media.example.com/cat.gif"}
        ]}"#,
    )
    .unwrap();

    let output = replay(&dir)
        .args(["--density", "comment", "--format", "json", "--initial"])
        .arg(&initial)
        .write_stdin(
            "{\"type\":\"ADD_ATTACHMENT\",\"payload\":{\"_id\":\"v\",\"fileName\":\"clip\",\"fileType\":\"video\",\"url\":\"http://www.youtube.com/embed/dQw4w9WgXcQ\"}}\n",
        )
        .output()
        .unwrap();
    assert!(output.status.success());

    let report = report(&output.stdout);
    assert_eq!(report["scroll_width"], 216 + 192);
    assert_eq!(report["display_order"], serde_json::json!(["v", "g"]));
}

#[test]
fn test_init_poll_with_three_options() {
    let dir = TempDir::new().unwrap();

    let output = replay(&dir)
        .args(["--format", "json"])
        .write_stdin(THREE_EMPTY_OPTIONS)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report = report(&output.stdout);
    assert_eq!(report["document"]["polls"].as_array().unwrap().len(), 3);
    assert_eq!(report["poll_toggle"], "remove_all");
}

#[test]
fn test_init_poll_with_empty_payload_is_ignored() {
    let dir = TempDir::new().unwrap();

    let output = replay(&dir)
        .args(["--format", "json"])
        .write_stdin("{\"type\":\"INIT_POLL\",\"payload\":[]}\n")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report = report(&output.stdout);
    assert!(report["document"].get("polls").is_none());
    assert_eq!(report["changed"], 0);
}

#[test]
fn test_voted_poll_is_not_edited() {
    let dir = TempDir::new().unwrap();
    let initial = dir.path().join("draft.json");
    fs::write(
        &initial,
        r#"{"polls": [
            {"_id": "A", "option": "yes", "votes": ["u1"]},
            {"_id": "B", "option": "no", "votes": []},
            {"_id": "C", "option": "maybe", "votes": []}
        ]}"#,
    )
    .unwrap();

    let output = replay(&dir)
        .args(["--format", "json", "--initial"])
        .arg(&initial)
        .write_stdin(
            "{\"type\":\"SET_POLL\",\"payload\":{\"_id\":\"A\",\"option\":\"HACKED\"}}\n\
             {\"type\":\"REMOVE_POLL\",\"payload\":\"C\"}\n\
             {\"type\":\"REMOVE_ALL_POLL\"}\n",
        )
        .output()
        .unwrap();
    assert!(output.status.success());

    let report = report(&output.stdout);
    let polls = report["document"]["polls"].as_array().unwrap();
    assert_eq!(polls.len(), 3);
    assert_eq!(polls[0]["option"], "yes");
    assert_eq!(report["applied"], 3);
    assert_eq!(report["changed"], 0);
    assert_eq!(report["polls_editable"], false);
}

#[test]
fn test_unknown_actions_are_ignored() {
    let dir = TempDir::new().unwrap();

    let output = replay(&dir)
        .args(["--format", "json"])
        .write_stdin("{\"type\":\"UNDEFINED_ACTION_TYPE\"}\n")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report = report(&output.stdout);
    assert_eq!(report["document"], serde_json::json!({}));
    assert_eq!(report["applied"], 1);
    assert_eq!(report["changed"], 0);
}

#[test]
fn test_malformed_action_exits_with_invalid_input() {
    let dir = TempDir::new().unwrap();

    replay(&dir)
        .write_stdin("{\"type\":\"SET_TITLE\",\"payload\":42}\n")
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("line 1"));
}

#[test]
fn test_malformed_initial_document_exits_with_invalid_input() {
    let dir = TempDir::new().unwrap();
    let initial = dir.path().join("draft.json");
    fs::write(&initial, "not json").unwrap();

    replay(&dir)
        .arg("--initial")
        .arg(&initial)
        .write_stdin("")
        .assert()
        .failure()
        .code(3);
}

#[test]
fn test_missing_actions_file_is_general_error() {
    let dir = TempDir::new().unwrap();

    replay(&dir)
        .arg(dir.path().join("absent.jsonl"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to open actions file"));
}

#[test]
fn test_attach_resolves_before_output() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("note.txt");
    fs::write(&file, "hi").unwrap();

    let output = replay(&dir)
        .args(["--format", "json", "--attach"])
        .arg(&file)
        .write_stdin("")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report = report(&output.stdout);
    let attachment = &report["document"]["attachments"][0];
    assert_eq!(attachment["fileName"], "note.txt");
    assert_eq!(attachment["fileType"], "attachment");
    assert_eq!(attachment["url"], "data:text/plain;base64,aGk=");
    assert_eq!(report["resolved"], 1);
    assert_eq!(report["pending_attachments"], 0);
}

#[test]
fn test_attach_over_limit_exits_with_too_large() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    fs::write(&config, "[upload]\nmax_bytes = 4\n").unwrap();
    let file = dir.path().join("big.bin");
    fs::write(&file, [0u8; 32]).unwrap();

    replay(&dir)
        .arg("--config")
        .arg(&config)
        .arg("--attach")
        .arg(&file)
        .write_stdin("")
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("File too large"));
}

#[test]
fn test_config_disallowing_polls() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    fs::write(&config, "[allowed]\npolls = false\n").unwrap();

    let output = replay(&dir)
        .arg("--config")
        .arg(&config)
        .args(["--format", "json"])
        .write_stdin(THREE_EMPTY_OPTIONS)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report = report(&output.stdout);
    assert!(report["document"].get("polls").is_none());
    assert_eq!(report["changed"], 0);
}

#[test]
fn test_invalid_config_is_general_error() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    fs::write(&config, "[editor]\ndensity = \"huge\"\n").unwrap();

    replay(&dir)
        .arg("--config")
        .arg(&config)
        .write_stdin("")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to load config"));
}
