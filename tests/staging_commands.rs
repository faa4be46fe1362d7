use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

use common::command::{gitlet_stdout, init_repository_dir, repository_dir, run_gitlet_command};
use common::file::{FileSpec, write_file};

#[rstest]
fn adding_a_missing_file_is_rejected(init_repository_dir: TempDir) {
    run_gitlet_command(init_repository_dir.path(), &["add", "ghost.txt"])
        .assert()
        .success()
        .stdout("File does not exist.\n");
}

#[rstest]
fn added_files_show_up_as_staged(init_repository_dir: TempDir) {
    write_file(FileSpec::new(
        init_repository_dir.path().join("a.txt"),
        "content".to_string(),
    ));

    run_gitlet_command(init_repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let status = gitlet_stdout(init_repository_dir.path(), &["status"]);
    assert!(status.contains("=== Staged Files ===\na.txt\n"));
}

#[rstest]
fn adding_the_tracked_version_unstages_the_file(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    write_file(FileSpec::new(dir.join("a.txt"), "original".to_string()));
    run_gitlet_command(dir, &["add", "a.txt"]).assert().success();
    run_gitlet_command(dir, &["commit", "c1"]).assert().success();

    // change, stage, then change back to the committed version
    write_file(FileSpec::new(dir.join("a.txt"), "changed".to_string()));
    run_gitlet_command(dir, &["add", "a.txt"]).assert().success();
    write_file(FileSpec::new(dir.join("a.txt"), "original".to_string()));
    run_gitlet_command(dir, &["add", "a.txt"]).assert().success();

    let status = gitlet_stdout(dir, &["status"]);
    assert!(status.contains("=== Staged Files ===\n\n"));
    assert!(status.contains("=== Untracked Files ===\n\n"));
}

#[rstest]
fn removing_an_unknown_file_is_rejected(init_repository_dir: TempDir) {
    write_file(FileSpec::new(
        init_repository_dir.path().join("loose.txt"),
        "never added".to_string(),
    ));

    run_gitlet_command(init_repository_dir.path(), &["rm", "loose.txt"])
        .assert()
        .success()
        .stdout("No reason to remove the file.\n");
}

#[rstest]
fn removing_a_staged_file_only_unstages_it(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    write_file(FileSpec::new(dir.join("a.txt"), "content".to_string()));
    run_gitlet_command(dir, &["add", "a.txt"]).assert().success();
    run_gitlet_command(dir, &["rm", "a.txt"]).assert().success();

    let status = gitlet_stdout(dir, &["status"]);
    assert!(status.contains("=== Staged Files ===\n\n"));
    assert!(status.contains("=== Removed Files ===\n\n"));
    // the file stays in the working directory, now untracked
    assert!(dir.join("a.txt").is_file());
    assert!(status.contains("=== Untracked Files ===\na.txt\n"));
}

#[rstest]
fn removing_a_tracked_file_stages_the_removal_and_deletes_it(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    write_file(FileSpec::new(dir.join("a.txt"), "content".to_string()));
    run_gitlet_command(dir, &["add", "a.txt"]).assert().success();
    run_gitlet_command(dir, &["commit", "c1"]).assert().success();

    run_gitlet_command(dir, &["rm", "a.txt"]).assert().success();

    let status = gitlet_stdout(dir, &["status"]);
    assert!(status.contains("=== Removed Files ===\na.txt\n"));
    assert!(!dir.join("a.txt").exists());
}

#[rstest]
fn staging_again_after_rm_cancels_the_removal(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    write_file(FileSpec::new(dir.join("a.txt"), "content".to_string()));
    run_gitlet_command(dir, &["add", "a.txt"]).assert().success();
    run_gitlet_command(dir, &["commit", "c1"]).assert().success();

    run_gitlet_command(dir, &["rm", "a.txt"]).assert().success();
    write_file(FileSpec::new(dir.join("a.txt"), "content".to_string()));
    run_gitlet_command(dir, &["add", "a.txt"]).assert().success();

    let status = gitlet_stdout(dir, &["status"]);
    assert!(status.contains("=== Removed Files ===\n\n"));
    assert!(status.contains("=== Staged Files ===\n\n"));
}

#[rstest]
fn identical_contents_share_one_stored_blob(repository_dir: TempDir) {
    let dir = repository_dir.path();
    run_gitlet_command(dir, &["init"]).assert().success();

    write_file(FileSpec::new(dir.join("a.txt"), "same bytes".to_string()));
    write_file(FileSpec::new(dir.join("b.txt"), "same bytes".to_string()));
    run_gitlet_command(dir, &["add", "a.txt"]).assert().success();
    run_gitlet_command(dir, &["add", "b.txt"]).assert().success();

    let blobs = std::fs::read_dir(dir.join(".gitlet").join("blobs"))
        .unwrap()
        .filter_map(|entry| entry.ok())
        .count();
    assert_eq!(blobs, 1, "equal content must deduplicate to one blob");
}
