use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

use common::command::{gitlet_stdout, init_repository_dir, run_gitlet_command};
use common::file::{FileSpec, write_file};

#[rstest]
fn fresh_repository_status_is_empty(init_repository_dir: TempDir) {
    let status = gitlet_stdout(init_repository_dir.path(), &["status"]);

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
fn every_section_is_populated_in_lexicographic_order(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    for (file_name, content) in [("a.txt", "a"), ("b.txt", "b"), ("c.txt", "c")] {
        write_file(FileSpec::new(dir.join(file_name), content.to_string()));
        run_gitlet_command(dir, &["add", file_name]).assert().success();
    }
    run_gitlet_command(dir, &["commit", "setup"]).assert().success();

    // staged: two additions, staged in reverse name order
    write_file(FileSpec::new(dir.join("f.txt"), "f".to_string()));
    write_file(FileSpec::new(dir.join("e.txt"), "e".to_string()));
    run_gitlet_command(dir, &["add", "f.txt"]).assert().success();
    run_gitlet_command(dir, &["add", "e.txt"]).assert().success();
    // removed
    run_gitlet_command(dir, &["rm", "b.txt"]).assert().success();
    // modified without staging
    write_file(FileSpec::new(dir.join("a.txt"), "changed".to_string()));
    // tracked but deleted from the working directory
    std::fs::remove_file(dir.join("c.txt")).unwrap();
    // untracked
    write_file(FileSpec::new(dir.join("loose.txt"), "loose".to_string()));

    let status = gitlet_stdout(dir, &["status"]);

    let expected = "=== Branches ===\n\
                    *master\n\
                    \n\
                    === Staged Files ===\n\
                    e.txt\n\
                    f.txt\n\
                    \n\
                    === Removed Files ===\n\
                    b.txt\n\
                    \n\
                    === Modifications Not Staged For Commit ===\n\
                    a.txt (modified)\n\
                    c.txt (deleted)\n\
                    \n\
                    === Untracked Files ===\n\
                    loose.txt\n\
                    \n";
    assert_eq!(status, expected);
}

#[rstest]
fn modifying_a_committed_file_without_staging_is_reported(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    write_file(FileSpec::new(dir.join("f"), "x".to_string()));
    run_gitlet_command(dir, &["add", "f"]).assert().success();
    run_gitlet_command(dir, &["commit", "c1"]).assert().success();

    write_file(FileSpec::new(dir.join("f"), "y".to_string()));

    let status = gitlet_stdout(dir, &["status"]);
    assert!(status.contains("=== Modifications Not Staged For Commit ===\nf (modified)\n"));
}

#[rstest]
fn staged_file_changed_afterwards_is_reported_as_modified(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    write_file(FileSpec::new(dir.join("f.txt"), "staged".to_string()));
    run_gitlet_command(dir, &["add", "f.txt"]).assert().success();
    write_file(FileSpec::new(dir.join("f.txt"), "changed since".to_string()));

    let status = gitlet_stdout(dir, &["status"]);
    assert!(status.contains("=== Modifications Not Staged For Commit ===\nf.txt (modified)\n"));
}

#[rstest]
fn staged_file_deleted_afterwards_is_reported_as_deleted(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    write_file(FileSpec::new(dir.join("f.txt"), "staged".to_string()));
    run_gitlet_command(dir, &["add", "f.txt"]).assert().success();
    std::fs::remove_file(dir.join("f.txt")).unwrap();

    let status = gitlet_stdout(dir, &["status"]);
    assert!(status.contains("=== Modifications Not Staged For Commit ===\nf.txt (deleted)\n"));
}

#[rstest]
fn file_recreated_after_rm_is_untracked(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    write_file(FileSpec::new(dir.join("f.txt"), "tracked".to_string()));
    run_gitlet_command(dir, &["add", "f.txt"]).assert().success();
    run_gitlet_command(dir, &["commit", "c1"]).assert().success();

    run_gitlet_command(dir, &["rm", "f.txt"]).assert().success();
    write_file(FileSpec::new(dir.join("f.txt"), "recreated".to_string()));

    let status = gitlet_stdout(dir, &["status"]);
    assert!(status.contains("=== Removed Files ===\nf.txt\n"));
    assert!(status.contains("=== Untracked Files ===\nf.txt\n"));
}

#[rstest]
fn branches_are_listed_in_order_with_the_current_one_starred(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    run_gitlet_command(dir, &["branch", "zebra"]).assert().success();
    run_gitlet_command(dir, &["branch", "apple"]).assert().success();

    let status = gitlet_stdout(dir, &["status"]);
    assert!(status.starts_with("=== Branches ===\napple\n*master\nzebra\n\n"));
}

#[rstest]
fn touched_but_unchanged_files_are_not_reported(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    write_file(FileSpec::new(dir.join("f.txt"), "same".to_string()));
    run_gitlet_command(dir, &["add", "f.txt"]).assert().success();
    run_gitlet_command(dir, &["commit", "c1"]).assert().success();

    // rewrite the identical content
    write_file(FileSpec::new(dir.join("f.txt"), "same".to_string()));

    let status = gitlet_stdout(dir, &["status"]);
    assert!(status.contains("=== Modifications Not Staged For Commit ===\n\n"));
}
