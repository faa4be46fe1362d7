use crate::areas::repository::Repository;
use crate::artifacts::core::user_error;

const BRANCH_EXISTS: &str = "A branch with that name already exists.";

impl Repository {
    /// Create a new branch pointing at the current head commit. Does not
    /// switch to it.
    pub fn branch(&mut self, branch_name: &str) -> anyhow::Result<()> {
        if self.refs().branch_exists(branch_name) {
            return Err(user_error(BRANCH_EXISTS));
        }

        let head = self.head_state()?;
        self.refs().create_branch(branch_name, &head.commit_id)
    }
}
