use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn has_git() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}

fn git(dir: &Path, args: &[&str]) {
    assert!(Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
}

fn init_git_repo(dir: &Path) {
    git(dir, &["init", "-q"]);
    git(dir, &["config", "core.autocrlf", "false"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
}

fn commit_as(dir: &Path, name: &str, email: &str, file: &str, content: &str) {
    fs::write(dir.join(file), content).unwrap();
    git(dir, &["add", "."]);
    git(
        dir,
        &[
            "-c",
            &format!("user.name={name}"),
            "-c",
            &format!("user.email={email}"),
            "commit",
            "-q",
            "-m",
            &format!("update {file}"),
        ],
    );
}

fn cmd() -> Command {
    Command::cargo_bin("git-authorship").unwrap()
}

#[test]
fn missing_argument_prints_usage() {
    cmd()
        .assert()
        .failure()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn extra_argument_prints_usage() {
    cmd()
        .args(["one", "two"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn nonexistent_path_fails_without_report() {
    let dir = tempdir().unwrap();

    cmd()
        .arg(dir.path().join("nope"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("Repository path not found"))
        .stdout(predicate::str::contains("Total commits").not());
}

#[test]
fn plain_directory_is_not_a_repository() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();

    cmd()
        .arg(dir.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("Not a git repository"));
}

#[test]
fn empty_repository_reports_zero_commits() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    init_git_repo(dir.path());

    cmd()
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Total commits: 0"))
        .stdout(predicate::str::contains("No commits found."))
        .stderr(predicate::str::contains("WARN").not());
}

#[test]
fn text_report_ranks_authors() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    init_git_repo(dir.path());
    commit_as(dir.path(), "Alice", "alice@example.com", "a.txt", "1\n");
    commit_as(dir.path(), "Bob", "bob@example.com", "b.txt", "1\n2\n");
    commit_as(dir.path(), "alice", "alice@example.com", "a.txt", "1\n2\n3\n");

    let out = cmd()
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Total commits: 3"))
        .stdout(predicate::str::contains("Total insertions: 5"))
        .get_output()
        .stdout
        .clone();

    let text = String::from_utf8(out).unwrap();
    let first = text.find("alice@example.com").unwrap();
    let second = text.find("bob@example.com").unwrap();
    assert!(first < second);
    assert_eq!(text.matches("alice@example.com").count(), 1);
    assert!(text.contains("2 commits (66.7%)"));
}

#[test]
fn json_report_totals_match_authors() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    init_git_repo(dir.path());
    commit_as(dir.path(), "Alice", "alice@example.com", "a.txt", "1\n");
    commit_as(dir.path(), "Bob", "bob@example.com", "a.txt", "2\n");

    let out = cmd()
        .arg(dir.path())
        .args(["--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let authors = v["authors"].as_array().unwrap();
    assert_eq!(v["totals"]["commits"], 2);
    assert_eq!(authors.len(), 2);

    let sum = |key: &str| authors.iter().map(|a| a[key].as_u64().unwrap()).sum::<u64>();
    assert_eq!(sum("commits"), 2);
    assert_eq!(sum("insertions"), v["totals"]["insertions"].as_u64().unwrap());
    assert_eq!(sum("deletions"), v["totals"]["deletions"].as_u64().unwrap());
}

#[test]
fn csv_report_has_one_row_per_author() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    init_git_repo(dir.path());
    commit_as(dir.path(), "Alice", "alice@example.com", "a.txt", "1\n");

    cmd()
        .arg(dir.path())
        .args(["--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("rank,name,email,commits"))
        .stdout(predicate::str::contains("1,Alice,alice@example.com,1,100.0,1,1,0,"));
}

#[test]
fn unknown_format_is_rejected() {
    let dir = tempdir().unwrap();

    cmd()
        .arg(dir.path())
        .args(["--format", "xml"])
        .assert()
        .failure();
}
