use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_gitlet_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    repository_dir
}

pub fn run_gitlet_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("gitlet").expect("Failed to find gitlet binary");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

/// Run a command expected to succeed and capture its stdout.
pub fn gitlet_stdout(dir: &Path, args: &[&str]) -> String {
    let assertion = run_gitlet_command(dir, args).assert().success();
    let stdout = assertion.get_output().stdout.clone();
    String::from_utf8(stdout).expect("Command output is not UTF-8")
}

/// Commit ids as they appear in `log` output, newest first.
pub fn log_commit_ids(dir: &Path) -> Vec<String> {
    gitlet_stdout(dir, &["log"])
        .lines()
        .filter_map(|line| line.strip_prefix("commit "))
        .map(|commit_id| commit_id.to_string())
        .collect()
}

pub fn head_commit_id(dir: &Path) -> String {
    log_commit_ids(dir)
        .first()
        .cloned()
        .expect("log shows at least the initial commit")
}
