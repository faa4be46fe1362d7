use crate::areas::database::CommitCache;
use crate::areas::repository::Repository;
use crate::artifacts::core::user_error;
use crate::artifacts::merge::resolver::{self, MergeAction};
use crate::artifacts::merge::split_finder::SplitPointFinder;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::inspector::Inspector;
use std::collections::BTreeSet;
use std::io::Write;

const UNCOMMITTED_CHANGES: &str = "You have uncommitted changes.";
const NO_SUCH_BRANCH: &str = "A branch with that name does not exist.";
const MERGE_WITH_SELF: &str = "Cannot merge a branch with itself.";
const ANCESTOR_OF_CURRENT: &str = "Given branch is an ancestor of the current branch.";
const FAST_FORWARDED: &str = "Current branch fast-forwarded.";
const MERGE_CONFLICT: &str = "Encountered a merge conflict.";

impl Repository {
    /// Merge the given branch into the current branch.
    ///
    /// After the preconditions pass, the split point (latest common
    /// ancestor) of the two heads is located; every file in the union of
    /// the three trees is classified by the eight-case resolution table and
    /// applied to the working directory and staging area; and a merge
    /// commit with both heads as parents is created.
    pub fn merge(&mut self, branch_name: &str) -> anyhow::Result<()> {
        {
            let staging = self.staging();
            let mut staging = staging.borrow_mut();
            staging.rehydrate()?;
            if !staging.is_empty() {
                return Err(user_error(UNCOMMITTED_CHANGES));
            }
        }

        let Some(other_commit_id) = self.refs().read_branch(branch_name)? else {
            return Err(user_error(NO_SUCH_BRANCH));
        };
        let head = self.head_state()?;
        if branch_name == head.branch_name {
            return Err(user_error(MERGE_WITH_SELF));
        }

        let other_commit = self.database().load_commit(&other_commit_id)?;
        Inspector::new(self).ensure_no_untracked_in_the_way(other_commit.tree())?;

        let split_commit_id = self.find_split_point(&head.commit_id, &other_commit_id)?;

        if split_commit_id == other_commit_id {
            writeln!(self.writer(), "{}", ANCESTOR_OF_CURRENT)?;
            return Ok(());
        }
        if split_commit_id == head.commit_id {
            self.checkout_branch(branch_name)?;
            writeln!(self.writer(), "{}", FAST_FORWARDED)?;
            return Ok(());
        }

        let current_commit = self.database().load_commit(&head.commit_id)?;
        let split_commit = self.database().load_commit(&split_commit_id)?;
        let conflicted = self.apply_resolutions(&split_commit, &current_commit, &other_commit)?;

        let message = format!("Merged {} into {}.", branch_name, head.branch_name);
        self.commit_with_merge(&message, Some(other_commit_id))?;

        if conflicted {
            writeln!(self.writer(), "{}", MERGE_CONFLICT)?;
        }

        Ok(())
    }

    fn find_split_point(
        &self,
        head_commit_id: &ObjectId,
        other_commit_id: &ObjectId,
    ) -> anyhow::Result<ObjectId> {
        let mut commit_cache = CommitCache::new();
        commit_cache.load_ancestry(self.database(), head_commit_id)?;
        commit_cache.load_ancestry(self.database(), other_commit_id)?;

        let finder = SplitPointFinder::new(|oid| {
            commit_cache
                .get_slim_commit(oid)
                .expect("commit ancestry is preloaded")
        });

        finder
            .find_split_point(head_commit_id, other_commit_id)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "no common ancestor between {} and {}",
                    head_commit_id,
                    other_commit_id
                )
            })
    }

    /// Classify and apply every file in the union of the three trees.
    /// Returns whether any file took the conflict case.
    fn apply_resolutions(
        &mut self,
        split_commit: &Commit,
        current_commit: &Commit,
        other_commit: &Commit,
    ) -> anyhow::Result<bool> {
        let file_names: BTreeSet<&String> = current_commit
            .tree()
            .keys()
            .chain(other_commit.tree().keys())
            .chain(split_commit.tree().keys())
            .collect();

        let mut conflicted = false;

        let staging = self.staging();
        let mut staging = staging.borrow_mut();

        for file_name in file_names {
            let action = resolver::classify(
                split_commit.blob_id(file_name),
                current_commit.blob_id(file_name),
                other_commit.blob_id(file_name),
            );

            match action {
                MergeAction::Keep => {}
                MergeAction::TakeOther => {
                    let blob_id = other_commit
                        .blob_id(file_name)
                        .expect("other branch tracks the file it contributes");
                    let blob = self.database().load_blob(blob_id)?;
                    self.workspace().write_file(file_name, blob.content())?;
                    staging.stage_addition(file_name, blob_id.clone());
                }
                MergeAction::Remove => {
                    staging.stage_removal(file_name);
                    self.workspace().remove_file(file_name)?;
                }
                MergeAction::Conflict => {
                    let current_content = self.blob_content(current_commit, file_name)?;
                    let other_content = self.blob_content(other_commit, file_name)?;
                    let content = resolver::conflict_content(
                        current_content.as_deref(),
                        other_content.as_deref(),
                    );

                    let blob = Blob::new(content.clone());
                    let blob_id = self.database().store(&blob)?;
                    self.workspace().write_file(file_name, &content)?;
                    staging.stage_addition(file_name, blob_id);

                    conflicted = true;
                }
            }
        }

        staging.save()?;

        Ok(conflicted)
    }

    fn blob_content(&self, commit: &Commit, file_name: &str) -> anyhow::Result<Option<String>> {
        let Some(blob_id) = commit.blob_id(file_name) else {
            return Ok(None);
        };

        let blob = self.database().load_blob(blob_id)?;
        Ok(Some(blob.content().to_string()))
    }
}
