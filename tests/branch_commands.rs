use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

use common::command::{
    gitlet_stdout, head_commit_id, init_repository_dir, run_gitlet_command,
};
use common::file::{FileSpec, write_file};

#[rstest]
fn branch_points_at_the_head_commit_without_switching(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let head_id = head_commit_id(dir);

    run_gitlet_command(dir, &["branch", "dev"]).assert().success();

    // still on master; the new branch shares the head commit
    let status = gitlet_stdout(dir, &["status"]);
    assert!(status.starts_with("=== Branches ===\ndev\n*master\n"));

    run_gitlet_command(dir, &["checkout", "dev"]).assert().success();
    assert_eq!(head_commit_id(dir), head_id);
}

#[rstest]
fn duplicate_branch_names_are_rejected(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    run_gitlet_command(dir, &["branch", "dev"]).assert().success();
    run_gitlet_command(dir, &["branch", "dev"])
        .assert()
        .success()
        .stdout("A branch with that name already exists.\n");
}

#[rstest]
fn rm_branch_deletes_only_the_pointer(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    run_gitlet_command(dir, &["branch", "dev"]).assert().success();
    run_gitlet_command(dir, &["checkout", "dev"]).assert().success();
    write_file(FileSpec::new(dir.join("dev.txt"), "d".to_string()));
    run_gitlet_command(dir, &["add", "dev.txt"]).assert().success();
    run_gitlet_command(dir, &["commit", "on dev"]).assert().success();
    run_gitlet_command(dir, &["checkout", "master"]).assert().success();

    run_gitlet_command(dir, &["rm-branch", "dev"]).assert().success();

    let status = gitlet_stdout(dir, &["status"]);
    assert!(!status.contains("dev\n"));

    // the branch's commits survive the pointer deletion
    let global_log = gitlet_stdout(dir, &["global-log"]);
    assert!(global_log.contains("on dev"));
}

#[rstest]
fn rm_branch_of_a_missing_branch_is_rejected(init_repository_dir: TempDir) {
    run_gitlet_command(init_repository_dir.path(), &["rm-branch", "ghost"])
        .assert()
        .success()
        .stdout("A branch with that name does not exist.\n");
}

#[rstest]
fn rm_branch_of_the_current_branch_is_rejected(init_repository_dir: TempDir) {
    run_gitlet_command(init_repository_dir.path(), &["rm-branch", "master"])
        .assert()
        .success()
        .stdout("Cannot remove the current branch.\n");
}
