use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

use common::command::{
    gitlet_stdout, init_repository_dir, log_commit_ids, run_gitlet_command,
};
use common::file::{FileSpec, write_file};

#[rstest]
fn commit_records_the_staged_snapshot(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    write_file(FileSpec::new(dir.join("a.txt"), "hello".to_string()));
    run_gitlet_command(dir, &["add", "a.txt"]).assert().success();
    run_gitlet_command(dir, &["commit", "first"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let log = gitlet_stdout(dir, &["log"]);
    assert_eq!(log_commit_ids(dir).len(), 2, "initial commit plus one");
    assert!(log.contains("first"));
    assert!(log.contains("initial commit"));

    // nothing left staged, removed, or untracked
    let status = gitlet_stdout(dir, &["status"]);
    let expected = "=== Branches ===\n\
                    *master\n\
                    \n\
                    === Staged Files ===\n\
                    \n\
                    === Removed Files ===\n\
                    \n\
                    === Modifications Not Staged For Commit ===\n\
                    \n\
                    === Untracked Files ===\n\
                    \n";
    assert_eq!(status, expected);
}

#[rstest]
fn commit_with_nothing_staged_is_rejected(init_repository_dir: TempDir) {
    run_gitlet_command(init_repository_dir.path(), &["commit", "empty"])
        .assert()
        .success()
        .stdout("No changes added to the commit.\n");
}

#[rstest]
fn commit_with_an_empty_message_changes_nothing(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    write_file(FileSpec::new(dir.join("a.txt"), "hello".to_string()));
    run_gitlet_command(dir, &["add", "a.txt"]).assert().success();

    run_gitlet_command(dir, &["commit", ""])
        .assert()
        .success()
        .stdout("Please enter a commit message.\n");

    // no commit was created and the staging area survived
    assert_eq!(log_commit_ids(dir).len(), 1);
    let status = gitlet_stdout(dir, &["status"]);
    assert!(status.contains("=== Staged Files ===\na.txt\n"));
}

#[rstest]
fn commit_applies_staged_removals(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    write_file(FileSpec::new(dir.join("a.txt"), "keep".to_string()));
    write_file(FileSpec::new(dir.join("b.txt"), "drop".to_string()));
    run_gitlet_command(dir, &["add", "a.txt"]).assert().success();
    run_gitlet_command(dir, &["add", "b.txt"]).assert().success();
    run_gitlet_command(dir, &["commit", "both"]).assert().success();

    run_gitlet_command(dir, &["rm", "b.txt"]).assert().success();
    run_gitlet_command(dir, &["commit", "only a"]).assert().success();

    // the dropped file is no longer present in the committed tree
    run_gitlet_command(dir, &["checkout", "--", "b.txt"])
        .assert()
        .success()
        .stdout("File does not exist in that commit.\n");
    run_gitlet_command(dir, &["checkout", "--", "a.txt"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[rstest]
fn commits_are_chained_through_their_first_parent(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    for (file_name, message) in [("a.txt", "c1"), ("b.txt", "c2"), ("c.txt", "c3")] {
        write_file(FileSpec::new(dir.join(file_name), message.to_string()));
        run_gitlet_command(dir, &["add", file_name]).assert().success();
        run_gitlet_command(dir, &["commit", message]).assert().success();
    }

    let log = gitlet_stdout(dir, &["log"]);
    let messages: Vec<&str> = log
        .lines()
        .filter(|line| line.starts_with('c') && line.len() == 2 || *line == "initial commit")
        .collect();
    assert_eq!(messages, vec!["c3", "c2", "c1", "initial commit"]);
}
