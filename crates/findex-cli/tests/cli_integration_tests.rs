//! CLI integration tests for findex
//!
//! Tests the findex CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CORPUS: &str = r#"{"type":"tasks","id":1,"name":"Fix payment bug","status":"pending","owner":"ana","createdAt":"2024-02-10","tags":["bug","critical"]}
{"type":"tasks","id":2,"name":"Write documentation","status":"completed","owner":"ben","createdAt":"2024-01-05","tags":["documentation"]}
{"type":"tasks","id":3,"name":"Legacy billing bug","status":"archived","owner":"ana","tags":["bug"]}
{"type":"contacts","id":1,"name":"Ada Lovelace","email":"ada@payments.test","role":"Analyst"}
"#;

/// Isolated config and data directories plus a corpus file
struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("corpus.jsonl"), CORPUS).unwrap();
        Self { dir }
    }

    fn corpus(&self) -> PathBuf {
        self.dir.path().join("corpus.jsonl")
    }

    fn saved_file(&self) -> PathBuf {
        self.dir.path().join("data").join("saved_searches.json")
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Helper to create a command confined to this sandbox
    #[allow(deprecated)]
    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("findex").unwrap();
        cmd.env("FINDEX_CONFIG_DIR", self.path().join("config"));
        cmd.env("FINDEX_DATA_DIR", self.path().join("data"));
        cmd.env_remove("RUST_LOG");
        cmd
    }

    fn search(&self, args: &[&str]) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("search").arg("--corpus").arg(self.corpus()).args(args);
        cmd
    }
}

#[test]
fn test_search_by_text() {
    let sandbox = Sandbox::new();

    sandbox
        .search(&["bug", "--type", "tasks"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tasks#1"))
        .stdout(predicate::str::contains("Fix payment bug"))
        .stdout(predicate::str::contains("Legacy billing bug").not())
        .stdout(predicate::str::contains("Write documentation").not());
}

#[test]
fn test_search_by_status_and_tag() {
    let sandbox = Sandbox::new();

    sandbox
        .search(&["--status", "completed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tasks#2"))
        .stdout(predicate::str::contains("tasks#1").not());

    sandbox
        .search(&["--tag", "critical", "--tag", "nothing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tasks#1"))
        .stdout(predicate::str::contains("tasks#2").not());
}

#[test]
fn test_show_archived_reveals_archived_entities() {
    let sandbox = Sandbox::new();

    sandbox
        .search(&["legacy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No results."));

    sandbox
        .search(&["legacy", "--show-archived"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tasks#3"))
        .stdout(predicate::str::contains("Active filters: 1 (showArchived)"));
}

#[test]
fn test_contact_email_is_searchable() {
    let sandbox = Sandbox::new();

    sandbox
        .search(&["payments.test"])
        .assert()
        .success()
        .stdout(predicate::str::contains("contacts#1"));
}

#[test]
fn test_search_json_output() {
    let sandbox = Sandbox::new();

    let output = sandbox
        .search(&["--format", "json", "--sort-by", "name", "--order", "asc", "--limit", "2"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let page: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(page["total"], 3);
    assert_eq!(page["limit"], 2);
    assert_eq!(page["activeFilters"], 1);
    assert_eq!(page["results"][0]["name"], "Ada Lovelace");
    assert_eq!(page["results"][1]["name"], "Fix payment bug");
    assert_eq!(page["results"][1]["createdAt"], "2024-02-10");
}

#[test]
fn test_invalid_date_is_rejected() {
    let sandbox = Sandbox::new();

    sandbox
        .search(&["--from", "last week"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not an ISO date"));
}

#[test]
fn test_missing_corpus_fails_with_hint() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["search", "--corpus"])
        .arg(sandbox.path().join("missing.jsonl"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"))
        .stderr(predicate::str::contains("hint:"));
}

#[test]
fn test_facets_lists_distinct_values() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .arg("facets")
        .arg("--corpus")
        .arg(sandbox.corpus())
        .assert()
        .success()
        .stdout(predicate::str::contains("Entities: 4"))
        .stdout(predicate::str::contains("ana (2)"))
        .stdout(predicate::str::contains("critical (1)"))
        .stdout(predicate::str::contains("archived (1)"));
}

#[test]
fn test_corpus_path_from_config() {
    let sandbox = Sandbox::new();
    let corpus = sandbox.corpus();

    sandbox
        .cmd()
        .args(["config", "set", "storage.corpus_path"])
        .arg(&corpus)
        .assert()
        .success();

    sandbox
        .cmd()
        .args(["search", "documentation"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tasks#2"));
}

#[test]
fn test_save_list_and_apply_saved_search() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args([
            "saved", "save", "Q1", "--status", "completed", "--from", "2024-01-01", "--to",
            "2024-03-31",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved search 'Q1' as #1"));

    let raw = std::fs::read_to_string(sandbox.saved_file()).unwrap();
    assert!(raw.contains("2024-01-01"));

    sandbox
        .cmd()
        .args(["saved", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Q1 (2 active filters)"));

    sandbox
        .search(&["--saved", "Q1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tasks#2"))
        .stdout(predicate::str::contains("tasks#1").not());
}

#[test]
fn test_flags_replace_saved_search_values() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["saved", "save", "ana-bugs", "bug", "--owner", "ana", "--show-archived"])
        .assert()
        .success();

    sandbox
        .search(&["--saved", "ana-bugs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tasks#1"))
        .stdout(predicate::str::contains("tasks#3"));

    sandbox
        .search(&["--saved", "ana-bugs", "--no-show-archived"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tasks#1"))
        .stdout(predicate::str::contains("tasks#3").not());

    sandbox
        .search(&["--saved", "ana-bugs", "--owner", "ben"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No results."));
}

#[test]
fn test_unknown_saved_name_fails() {
    let sandbox = Sandbox::new();

    sandbox
        .search(&["--saved", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No saved search named 'nope'"));
}

#[test]
fn test_delete_out_of_range_is_a_no_op() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["saved", "save", "only", "bug"])
        .assert()
        .success();

    sandbox
        .cmd()
        .args(["saved", "delete", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing deleted"));

    sandbox
        .cmd()
        .args(["saved", "delete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted saved search #1"));

    sandbox
        .cmd()
        .args(["saved", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved searches."));
}

#[test]
fn test_saved_show_json() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["saved", "save", "recent", "--from", "2024-01-15"])
        .assert()
        .success();

    let output = sandbox
        .cmd()
        .args(["--format", "json", "saved", "show", "1"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let shown: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(shown["name"], "recent");
    assert_eq!(shown["query"]["dateRange"]["from"], "2024-01-15");
    assert_eq!(shown["activeFilters"], 1);
}

#[test]
fn test_config_set_get_and_reset() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["config", "set", "display.page_size", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set display.page_size = 10"));

    sandbox
        .cmd()
        .args(["config", "get", "display.page_size"])
        .assert()
        .success()
        .stdout(predicate::str::diff("10\n"));

    sandbox
        .cmd()
        .args(["config", "set", "display.page_size", "0"])
        .assert()
        .failure();

    sandbox.cmd().args(["config", "reset"]).assert().success();

    sandbox
        .cmd()
        .args(["config", "get", "display.page_size"])
        .assert()
        .success()
        .stdout(predicate::str::diff("50\n"));
}

#[test]
fn test_config_unknown_key_fails() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["config", "get", "search.fuzzy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));
}

#[test]
fn test_quiet_search_prints_only_rows() {
    let sandbox = Sandbox::new();

    sandbox
        .search(&["--quiet", "documentation"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("  tasks#2"));
}
