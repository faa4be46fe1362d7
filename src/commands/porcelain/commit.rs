use crate::areas::repository::Repository;
use crate::artifacts::core::user_error;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;

const NOTHING_STAGED: &str = "No changes added to the commit.";
const EMPTY_MESSAGE: &str = "Please enter a commit message.";

impl Repository {
    /// Save a snapshot of the tracked files in the current commit and
    /// staging area as a new commit.
    pub fn commit(&mut self, message: &str) -> anyhow::Result<()> {
        self.commit_with_merge(message, None)
    }

    /// Shared commit path; merge commits pass the other branch's head as
    /// the second parent.
    ///
    /// The new tree is the head tree minus staged removals plus staged
    /// additions. Persistence order matters: the commit object becomes
    /// durable before the branch ref and HEAD advance to it, and the
    /// staging area is cleared last.
    pub(crate) fn commit_with_merge(
        &mut self,
        message: &str,
        merge_parent: Option<ObjectId>,
    ) -> anyhow::Result<()> {
        let staging = self.staging();
        let mut staging = staging.borrow_mut();
        staging.rehydrate()?;

        if staging.is_empty() {
            return Err(user_error(NOTHING_STAGED));
        }
        if message.is_empty() {
            return Err(user_error(EMPTY_MESSAGE));
        }

        let head = self.head_state()?;
        let head_commit = self.database().load_commit(&head.commit_id)?;

        let mut tree = head_commit.tree().clone();
        for file_name in staging.removals() {
            tree.remove(file_name);
        }
        for (file_name, blob_id) in staging.additions() {
            tree.insert(file_name.clone(), blob_id.clone());
        }

        let commit = Commit::new(
            message.to_string(),
            Some(head.commit_id.clone()),
            merge_parent,
            tree,
        );
        let commit_id = self.database().store(&commit)?;

        self.refs().update_branch(&head.branch_name, &commit_id)?;
        self.refs().write_head(&head.branch_name, &commit_id)?;

        staging.clear();
        staging.save()
    }
}
