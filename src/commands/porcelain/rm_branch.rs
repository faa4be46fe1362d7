use crate::areas::repository::Repository;
use crate::artifacts::core::user_error;

const NO_SUCH_BRANCH: &str = "A branch with that name does not exist.";
const CURRENT_BRANCH: &str = "Cannot remove the current branch.";

impl Repository {
    /// Delete the branch pointer with the given name. The commits created
    /// under the branch are untouched.
    pub fn rm_branch(&mut self, branch_name: &str) -> anyhow::Result<()> {
        if !self.refs().branch_exists(branch_name) {
            return Err(user_error(NO_SUCH_BRANCH));
        }

        let head = self.head_state()?;
        if branch_name == head.branch_name {
            return Err(user_error(CURRENT_BRANCH));
        }

        self.refs().delete_branch(branch_name)
    }
}
