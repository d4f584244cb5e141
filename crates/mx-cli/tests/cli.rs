//! End-to-end tests for the mockexam binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const BANK: &str = r#"[
    {"id": "q1", "domain": "Practices", "difficulty": "basic", "question": "First question?",
     "choices": ["right", "wrong"], "answerIndex": 0, "explanation": "Because."},
    {"id": "q2", "domain": "Practices", "difficulty": "medium", "question": "Second question?",
     "choices": ["wrong", "right", "also wrong"], "answerIndex": 1, "explanation": "Also because."},
    {"id": 3, "domain": "Security", "difficulty": "hard", "question": "Third question?",
     "choices": ["a", "b", "c", "d"], "answerIndex": 3, "explanation": "d it is."}
]"#;

const CONFIG: &str = r#"
[bank]
path = "questions.json"

[bookmarks]
path = "state/bookmarks.json"
"#;

/// Workspace with a bank and a configuration pointing at it
fn workspace() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("questions.json"), BANK).unwrap();
    fs::create_dir_all(temp.path().join(".mockexam")).unwrap();
    fs::write(temp.path().join(".mockexam/config.toml"), CONFIG).unwrap();
    temp
}

fn mockexam(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("mockexam").unwrap();
    cmd.current_dir(dir)
        .env_remove("MOCKEXAM_BANK")
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

#[test]
fn test_help() {
    let temp = TempDir::new().unwrap();
    mockexam(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("start"))
        .stdout(predicate::str::contains("bookmark"));
}

#[test]
fn test_bank_validate() {
    let temp = workspace();
    mockexam(temp.path())
        .args(["bank", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 questions in 2 domains"));
}

#[test]
fn test_bank_domains_json() {
    let temp = workspace();
    let output = mockexam(temp.path())
        .args(["bank", "domains", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let domains: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(domains[0]["name"], "Practices");
    assert_eq!(domains[0]["count"], 2);
    assert_eq!(domains[1]["name"], "Security");
}

#[test]
fn test_bank_show() {
    let temp = workspace();
    mockexam(temp.path())
        .args(["bank", "show", "3", "--answer"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Third question?"))
        .stdout(predicate::str::contains("Answer: d"));

    mockexam(temp.path())
        .args(["bank", "show", "q9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Question 'q9' not found"));
}

#[test]
fn test_malformed_bank_fails() {
    let temp = workspace();
    fs::write(
        temp.path().join("broken.json"),
        r#"[{"id": "q1", "domain": "A", "difficulty": "basic", "question": "?",
             "choices": ["only one"], "answerIndex": 0, "explanation": ""}]"#,
    )
    .unwrap();

    mockexam(temp.path())
        .args(["bank", "validate", "--bank", "broken.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("broken.json"));
}

#[test]
fn test_missing_bank_fails() {
    let temp = TempDir::new().unwrap();
    mockexam(temp.path())
        .args(["bank", "stats"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_bookmark_add_list_remove() {
    let temp = workspace();

    mockexam(temp.path())
        .args(["bookmark", "add", "q2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bookmarked q2"));
    assert!(temp.path().join("state/bookmarks.json").exists());

    mockexam(temp.path())
        .args(["bookmark", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Second question?"));

    mockexam(temp.path())
        .args(["bookmark", "remove", "q2"])
        .assert()
        .success();

    mockexam(temp.path())
        .args(["bookmark", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No bookmarks."));
}

#[test]
fn test_bookmark_list_uses_bank_from_env() {
    let temp = workspace();
    fs::write(
        temp.path().join("other.json"),
        r#"[{"id": "q1", "domain": "Other", "difficulty": "basic", "question": "Other bank?",
             "choices": ["x", "y"], "answerIndex": 0, "explanation": ""}]"#,
    )
    .unwrap();
    mockexam(temp.path())
        .args(["bookmark", "add", "q1"])
        .assert()
        .success();

    mockexam(temp.path())
        .env("MOCKEXAM_BANK", "other.json")
        .args(["bookmark", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Other bank?"))
        .stdout(predicate::str::contains("First question?").not());
}

#[test]
fn test_bookmark_bad_import_keeps_prior_set() {
    let temp = workspace();
    mockexam(temp.path())
        .args(["bookmark", "add", "q1"])
        .assert()
        .success();

    fs::write(temp.path().join("bad.json"), r#"{"q2": true}"#).unwrap();
    mockexam(temp.path())
        .args(["bookmark", "import", "bad.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Bookmarks unchanged"));

    mockexam(temp.path())
        .args(["bookmark", "list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("q1"))
        .stdout(predicate::str::contains("q2").not());
}

#[test]
fn test_bookmark_export_and_import() {
    let temp = workspace();
    mockexam(temp.path())
        .args(["bookmark", "toggle", "3"])
        .assert()
        .success();

    mockexam(temp.path())
        .args(["bookmark", "export", "-o", "saved.json"])
        .assert()
        .success();
    let exported: Vec<String> =
        serde_json::from_str(&fs::read_to_string(temp.path().join("saved.json")).unwrap())
            .unwrap();
    assert_eq!(exported, vec!["3"]);

    mockexam(temp.path())
        .args(["bookmark", "clear", "--yes"])
        .assert()
        .success();
    mockexam(temp.path())
        .args(["bookmark", "import", "saved.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 bookmarks"));
}

#[test]
fn test_config_path_and_show() {
    let temp = workspace();
    mockexam(temp.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".mockexam/config.toml"));

    let output = mockexam(temp.path())
        .args(["config", "show", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["bank"]["path"], "questions.json");
    assert_eq!(config["quiz"]["count"], 20);
}

#[test]
fn test_config_reset_and_validate() {
    let temp = workspace();
    mockexam(temp.path())
        .args(["config", "reset", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Backed up to"));

    let written = fs::read_to_string(temp.path().join(".mockexam/config.toml")).unwrap();
    assert!(written.contains("data/questions.json"));

    mockexam(temp.path())
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("valid TOML"));
}

#[test]
fn test_config_validate_rejects_zero_count() {
    let temp = workspace();
    fs::write(
        temp.path().join(".mockexam/config.toml"),
        "[quiz]\ncount = 0\n",
    )
    .unwrap();

    mockexam(temp.path())
        .args(["config", "validate"])
        .assert()
        .failure();
}

#[test]
fn test_start_rejects_zero_count() {
    let temp = workspace();
    mockexam(temp.path())
        .args(["start", "--plain", "--count", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("question count must be at least 1"));
}

#[test]
fn test_start_rejects_unknown_domain() {
    let temp = workspace();
    mockexam(temp.path())
        .args(["start", "--plain", "--domain", "Networking"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown domain 'Networking'"))
        .stderr(predicate::str::contains("Practices, Security"));
}
