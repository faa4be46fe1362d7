use crate::areas::repository::Repository;
use crate::artifacts::core::user_error;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::inspector::Inspector;

pub(crate) const NO_SUCH_COMMIT: &str = "No commit with that id exists.";
const NO_SUCH_FILE_IN_COMMIT: &str = "File does not exist in that commit.";
const NO_SUCH_BRANCH: &str = "No such branch exists.";
const ALREADY_CURRENT_BRANCH: &str = "No need to checkout the current branch.";

impl Repository {
    /// `checkout -- <file>`: restore the head commit's version of the file
    /// into the working directory. The staging area is untouched.
    pub fn checkout_file(&mut self, file_name: &str) -> anyhow::Result<()> {
        let head = self.head_state()?;
        self.checkout_file_at(&head.commit_id, file_name)
    }

    /// `checkout <commit id> -- <file>`: like `checkout_file`, against any
    /// commit; the id may be abbreviated to a unique prefix.
    pub fn checkout_file_from_commit(
        &mut self,
        commit_reference: &str,
        file_name: &str,
    ) -> anyhow::Result<()> {
        let commit_id = self
            .database()
            .resolve_commit_id(commit_reference)?
            .ok_or_else(|| user_error(NO_SUCH_COMMIT))?;

        self.checkout_file_at(&commit_id, file_name)
    }

    /// `checkout <branch>`: materialize the branch head's tree into the
    /// working directory, make that branch current, and clear the staging
    /// area. Untracked files the target would overwrite abort the command.
    pub fn checkout_branch(&mut self, branch_name: &str) -> anyhow::Result<()> {
        let Some(target_commit_id) = self.refs().read_branch(branch_name)? else {
            return Err(user_error(NO_SUCH_BRANCH));
        };

        let head = self.head_state()?;
        if branch_name == head.branch_name {
            return Err(user_error(ALREADY_CURRENT_BRANCH));
        }

        let target_commit = self.database().load_commit(&target_commit_id)?;
        Inspector::new(self).ensure_no_untracked_in_the_way(target_commit.tree())?;

        self.materialize_tree(&target_commit)?;
        self.refs().write_head(branch_name, &target_commit_id)?;

        let staging = self.staging();
        let mut staging = staging.borrow_mut();
        staging.clear();
        staging.save()
    }

    fn checkout_file_at(&self, commit_id: &ObjectId, file_name: &str) -> anyhow::Result<()> {
        let commit = self.database().load_commit(commit_id)?;
        let blob_id = commit
            .blob_id(file_name)
            .ok_or_else(|| user_error(NO_SUCH_FILE_IN_COMMIT))?;

        let blob = self.database().load_blob(blob_id)?;
        self.workspace().write_file(file_name, blob.content())
    }

    /// Overwrite the working directory with a commit's tree: write every
    /// file the target tracks, then delete every file tracked by the
    /// current head but absent from the target.
    ///
    /// Must run before HEAD moves; the untracked-file check is the
    /// caller's responsibility.
    pub(crate) fn materialize_tree(&self, target_commit: &Commit) -> anyhow::Result<()> {
        let current_commit = self.head_commit()?;

        for (file_name, blob_id) in target_commit.tree() {
            let blob = self.database().load_blob(blob_id)?;
            self.workspace().write_file(file_name, blob.content())?;
        }

        for file_name in self.workspace().list_files()? {
            if current_commit.tracks(&file_name) && !target_commit.tracks(&file_name) {
                self.workspace().remove_file(&file_name)?;
            }
        }

        Ok(())
    }
}
