use crate::areas::repository::Repository;
use crate::artifacts::core::user_error;
use crate::artifacts::status::inspector::Inspector;
use crate::commands::porcelain::checkout::NO_SUCH_COMMIT;

impl Repository {
    /// Check out all files tracked by the given commit, drop tracked files
    /// the commit does not have, and move the current branch's head to that
    /// commit. The staging area is cleared. The id may be abbreviated.
    pub fn reset(&mut self, commit_reference: &str) -> anyhow::Result<()> {
        let commit_id = self
            .database()
            .resolve_commit_id(commit_reference)?
            .ok_or_else(|| user_error(NO_SUCH_COMMIT))?;

        let target_commit = self.database().load_commit(&commit_id)?;
        Inspector::new(self).ensure_no_untracked_in_the_way(target_commit.tree())?;

        let head = self.head_state()?;
        self.materialize_tree(&target_commit)?;
        self.refs().update_branch(&head.branch_name, &commit_id)?;
        self.refs().write_head(&head.branch_name, &commit_id)?;

        let staging = self.staging();
        let mut staging = staging.borrow_mut();
        staging.clear();
        staging.save()
    }
}
