use crate::areas::refs::DEFAULT_BRANCH_NAME;
use crate::areas::repository::Repository;
use crate::artifacts::core::user_error;
use crate::artifacts::objects::commit::Commit;
use anyhow::Context;
use std::fs;

const ALREADY_EXISTS: &str =
    "A Gitlet version-control system already exists in the current directory.";

impl Repository {
    /// Create a new repository in the current directory: the `.gitlet`
    /// layout, the shared initial commit, and a `master` branch pointing at
    /// it.
    pub fn init(&mut self) -> anyhow::Result<()> {
        if self.is_initialized() {
            return Err(user_error(ALREADY_EXISTS));
        }

        fs::create_dir_all(self.database().blobs_path())
            .context("Failed to create .gitlet/blobs directory")?;
        fs::create_dir_all(self.database().commits_path())
            .context("Failed to create .gitlet/commits directory")?;
        fs::create_dir_all(self.refs().branches_path())
            .context("Failed to create .gitlet/branches directory")?;

        let initial_commit = Commit::initial();
        let initial_commit_id = self.database().store(&initial_commit)?;

        self.refs()
            .create_branch(DEFAULT_BRANCH_NAME, &initial_commit_id)?;
        self.refs()
            .write_head(DEFAULT_BRANCH_NAME, &initial_commit_id)?;

        self.staging().borrow().save()?;

        Ok(())
    }
}
