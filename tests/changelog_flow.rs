use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::cargo;
use tempfile::TempDir;

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .expect("git must be available for these tests");
    assert!(status.success(), "git {args:?} failed");
}

fn init_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    git(dir.path(), &["init", "-q"]);
    git(dir.path(), &["config", "user.email", "dev@example.com"]);
    git(dir.path(), &["config", "user.name", "Dev"]);
    dir
}

fn commit_file(dir: &Path, name: &str, contents: &str, message: &str) {
    fs::write(dir.join(name), contents).unwrap();
    git(dir, &["add", "."]);
    git(dir, &["commit", "-q", "-m", message]);
}

/// Binary invocation with a scrubbed environment: no API key, no user config.
fn changelogbot(repo: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo::cargo_bin_cmd!();
    cmd.current_dir(repo.path())
        .env("HOME", repo.path())
        .env_remove("OPENAI_API_KEY")
        .env_remove("CHANGELOGBOT_MODEL");
    cmd
}

#[test]
fn latest_strategy_appends_an_entry() {
    let repo = init_repo();
    commit_file(repo.path(), "Player.cs", "class Player {}\n", "add player");
    commit_file(
        repo.path(),
        "Player.cs",
        "class Player { void Jump() {} }\n",
        "add jump",
    );

    changelogbot(&repo)
        .args(["--strategy", "latest", "--no-model"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Generated Changelog:"));

    let contents = fs::read_to_string(repo.path().join("CHANGELOG.md")).unwrap();
    assert!(contents.contains("## [Latest Changes]"));
    assert!(contents.contains("Dummy changelog for testing"));
}

#[test]
fn runs_strictly_append_to_an_existing_changelog() {
    let repo = init_repo();
    commit_file(repo.path(), "Player.cs", "class Player {}\n", "add player");
    commit_file(repo.path(), "Player.cs", "class Player { int hp; }\n", "add hp");

    let path = repo.path().join("CHANGELOG.md");
    fs::write(&path, "# Changelog\n\n- hand-written entry\n").unwrap();
    let before = fs::read(&path).unwrap();

    changelogbot(&repo)
        .args(["--strategy", "latest", "--no-model"])
        .assert()
        .success();

    let after = fs::read(&path).unwrap();
    assert_eq!(&after[..before.len()], &before[..]);
    assert!(after.len() > before.len());
}

#[test]
fn latest_strategy_without_matching_files_writes_nothing() {
    let repo = init_repo();
    commit_file(repo.path(), "notes.txt", "not code\n", "add notes");
    commit_file(repo.path(), "notes.txt", "still not code\n", "more notes");

    changelogbot(&repo)
        .args(["--strategy", "latest", "--no-model"])
        .assert()
        .success()
        .stdout(predicates::str::contains("No diffs found to process."));

    assert!(!repo.path().join("CHANGELOG.md").exists());
}

#[test]
fn window_strategy_without_matching_changes_records_the_sentinel() {
    let repo = init_repo();
    commit_file(repo.path(), "a.txt", "one\n", "first");
    commit_file(repo.path(), "b.txt", "two\n", "second");
    commit_file(repo.path(), "c.txt", "three\n", "third");

    changelogbot(&repo)
        .args(["--strategy", "window", "--commits", "2", "--no-model"])
        .assert()
        .success();

    let contents = fs::read_to_string(repo.path().join("CHANGELOG.md")).unwrap();
    assert!(contents.contains("## [Latest Changes]"));
    assert!(contents.contains("No significant changes detected."));
}

#[test]
fn missing_credential_still_appends_the_failure_text() {
    let repo = init_repo();
    commit_file(repo.path(), "Enemy.cs", "class Enemy {}\n", "add enemy");
    commit_file(
        repo.path(),
        "Enemy.cs",
        "class Enemy { int hp; }\n",
        "give enemies hp",
    );

    // No --no-model: the real client runs and fails its credential check
    // before any request goes out. The run still exits 0.
    changelogbot(&repo)
        .args(["--strategy", "latest"])
        .assert()
        .success();

    let contents = fs::read_to_string(repo.path().join("CHANGELOG.md")).unwrap();
    assert!(contents.contains("## [Latest Changes]"));
    assert!(contents.contains("Failed to generate changelog."));
}

#[test]
fn strict_exit_turns_stage_failures_into_a_nonzero_exit() {
    let repo = init_repo();
    commit_file(repo.path(), "Enemy.cs", "class Enemy {}\n", "add enemy");
    commit_file(
        repo.path(),
        "Enemy.cs",
        "class Enemy { int hp; }\n",
        "give enemies hp",
    );

    changelogbot(&repo)
        .args(["--strategy", "latest", "--strict-exit"])
        .assert()
        .failure();
}

#[test]
fn collector_failure_is_best_effort_by_default() {
    let repo = init_repo();
    commit_file(repo.path(), "only.txt", "one commit\n", "first");

    // HEAD~10 does not exist in a one-commit repo: the collector fails, the
    // run degrades to "no diffs" and still exits 0.
    changelogbot(&repo)
        .args(["--strategy", "window", "--commits", "10", "--no-model"])
        .assert()
        .success()
        .stdout(predicates::str::contains("No diffs found to process."));

    assert!(!repo.path().join("CHANGELOG.md").exists());
}
