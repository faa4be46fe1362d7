//! Working-tree reconciliation
//!
//! This module compares the working directory against the head commit and
//! the staging area to classify files for `status`:
//!
//! - Staged / removed: straight from the staging area
//! - Modified not staged: tracked or staged content that disagrees with the
//!   working file, or tracked/staged files missing from the workspace
//! - Untracked: working files that neither the head commit tracks nor the
//!   staging area stages for addition, plus files staged for removal that
//!   reappeared in the workspace
//!
//! It also implements the untracked-file safety check shared by
//! `checkout <branch>`, `reset`, and `merge`: an untracked working file that
//! the target tree would overwrite aborts the whole operation before any
//! state changes.

use crate::areas::repository::Repository;
use crate::artifacts::core::user_error;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};

const UNTRACKED_IN_THE_WAY: &str =
    "There is an untracked file in the way; delete it, or add and commit it first.";

/// What `status` prints, one lexicographically ordered list per section.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub staged: Vec<String>,
    pub removed: Vec<String>,
    /// Decorated entries, e.g. `f.txt (modified)` / `gone.txt (deleted)`
    pub modifications: Vec<String>,
    pub untracked: Vec<String>,
}

/// File status inspector
///
/// Compares the working directory, staging area, and head commit. Content
/// comparisons hash the working file and compare blob ids, so a file merely
/// touched but unchanged never shows up as modified.
#[derive(new)]
pub struct Inspector<'r> {
    repository: &'r Repository,
}

impl<'r> Inspector<'r> {
    /// Classify every file for `status`.
    ///
    /// The staging area handle must have been rehydrated by the caller.
    pub fn status_report(&self) -> anyhow::Result<StatusReport> {
        let staging = self.repository.staging();
        let staging = staging.borrow();
        let head_tree = self.repository.head_commit()?.tree().clone();

        let workspace_files = self.repository.workspace().list_files()?;
        let workspace_set: BTreeSet<&str> =
            workspace_files.iter().map(String::as_str).collect();

        let mut modifications = BTreeSet::new();
        let mut untracked = Vec::new();

        for file_name in &workspace_files {
            let workspace_blob_id = self.workspace_blob_id(file_name)?;

            let tracked_id = head_tree.get(file_name.as_str());
            let staged_id = staging.staged_blob_id(file_name);

            if let Some(tracked_id) = tracked_id
                && *tracked_id != workspace_blob_id
                && staged_id.is_none()
            {
                modifications.insert(Self::decorate(file_name, WorkspaceChangeType::Modified));
            } else if let Some(staged_id) = staged_id
                && *staged_id != workspace_blob_id
            {
                modifications.insert(Self::decorate(file_name, WorkspaceChangeType::Modified));
            }

            let untracked_by_engine = tracked_id.is_none() && staged_id.is_none();
            if untracked_by_engine || staging.is_staged_for_removal(file_name) {
                untracked.push(file_name.clone());
            }
        }

        // staged for addition but deleted from the working directory
        for file_name in staging.additions().keys() {
            if !workspace_set.contains(file_name.as_str()) {
                modifications.insert(Self::decorate(file_name, WorkspaceChangeType::Deleted));
            }
        }
        // tracked, not staged for removal, and deleted from the working directory
        for file_name in head_tree.keys() {
            if !staging.is_staged_for_removal(file_name)
                && !workspace_set.contains(file_name.as_str())
            {
                modifications.insert(Self::decorate(file_name, WorkspaceChangeType::Deleted));
            }
        }

        Ok(StatusReport {
            staged: staging.additions().keys().cloned().collect(),
            removed: staging.removals().iter().cloned().collect(),
            modifications: modifications.into_iter().collect(),
            untracked,
        })
    }

    /// The untracked-file-in-the-way safety check.
    ///
    /// Fails when any working file untracked by the head commit would be
    /// overwritten by materializing `target_tree`. Runs before `checkout
    /// <branch>`, `reset`, and `merge` mutate anything.
    pub fn ensure_no_untracked_in_the_way(
        &self,
        target_tree: &BTreeMap<String, ObjectId>,
    ) -> anyhow::Result<()> {
        let head_tree = self.repository.head_commit()?.tree().clone();

        for file_name in self.repository.workspace().list_files()? {
            if target_tree.contains_key(&file_name) && !head_tree.contains_key(&file_name) {
                return Err(user_error(UNTRACKED_IN_THE_WAY));
            }
        }

        Ok(())
    }

    fn workspace_blob_id(&self, file_name: &str) -> anyhow::Result<ObjectId> {
        let blob = self.repository.workspace().parse_blob(file_name)?;
        blob.object_id()
    }

    fn decorate(file_name: &str, change: WorkspaceChangeType) -> String {
        format!("{} ({})", file_name, change)
    }
}
