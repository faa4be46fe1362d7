//! Branch references and HEAD state
//!
//! Branches are named mutable pointers to commits, stored one file per
//! branch under `.gitlet/branches/<name>` as 40 hex characters. The HEAD
//! state lives in `.gitlet/repo` and pairs the current branch name with the
//! current commit id:
//!
//! ```text
//! branch: master
//! head: a0da1ea5a15ab613bf9961fd86f010cf74c7ee48
//! ```
//!
//! Outside the window of a command updating both, `head` always equals the
//! current branch's target. Ref writes go through a temp-file + rename so a
//! crash never leaves a ref pointing at a partially written id; the object
//! a ref points to is always durable before the ref itself (the commit
//! engine stores objects first).

use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use rand;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Pattern for parsing the HEAD state file
const HEAD_STATE_REGEX: &str = r"^branch: (.+)\nhead: ([0-9a-f]{40})\s*$";

/// Branch created by `init` and activated from the start.
pub const DEFAULT_BRANCH_NAME: &str = "master";

/// The current branch name plus the commit id it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadState {
    pub branch_name: String,
    pub commit_id: ObjectId,
}

/// Reference manager for branch files and the HEAD state
#[derive(Debug, new)]
pub struct Refs {
    /// Path to the repository state directory (`.gitlet`)
    path: Box<Path>,
}

impl Refs {
    pub fn branches_path(&self) -> PathBuf {
        self.path.join("branches")
    }

    pub fn head_path(&self) -> PathBuf {
        self.path.join("repo")
    }

    fn branch_path(&self, branch_name: &str) -> PathBuf {
        self.branches_path().join(branch_name)
    }

    pub fn branch_exists(&self, branch_name: &str) -> bool {
        self.branch_path(branch_name).is_file()
    }

    /// Read the commit id a branch points to, or `None` when no branch file
    /// with that name exists.
    pub fn read_branch(&self, branch_name: &str) -> anyhow::Result<Option<ObjectId>> {
        let branch_path = self.branch_path(branch_name);
        if !branch_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&branch_path)
            .with_context(|| format!("Unable to read branch file {:?}", branch_path))?;

        Ok(Some(ObjectId::try_parse(content.trim().to_string())?))
    }

    /// Create a branch pointing at the given commit. The caller is expected
    /// to have rejected duplicate names already.
    pub fn create_branch(&self, branch_name: &str, commit_id: &ObjectId) -> anyhow::Result<()> {
        let branch_path = self.branch_path(branch_name);
        anyhow::ensure!(
            !branch_path.exists(),
            "branch {} already exists",
            branch_name
        );

        self.update_ref_file(&branch_path, commit_id.as_ref())
    }

    /// Advance a branch to a new commit.
    pub fn update_branch(&self, branch_name: &str, commit_id: &ObjectId) -> anyhow::Result<()> {
        self.update_ref_file(&self.branch_path(branch_name), commit_id.as_ref())
    }

    /// Delete a branch file. Never touches the commits it pointed at.
    pub fn delete_branch(&self, branch_name: &str) -> anyhow::Result<()> {
        let branch_path = self.branch_path(branch_name);
        std::fs::remove_file(&branch_path)
            .with_context(|| format!("Unable to delete branch file {:?}", branch_path))
    }

    /// List all branch names, in lexicographic order.
    pub fn list_branches(&self) -> anyhow::Result<Vec<String>> {
        let branches_path = self.branches_path();

        let mut branch_names = WalkDir::new(&branches_path)
            .min_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect::<Vec<_>>();
        branch_names.sort();

        Ok(branch_names)
    }

    /// Read the HEAD state, or `None` when the repository has not been
    /// initialized yet.
    pub fn read_head(&self) -> anyhow::Result<Option<HeadState>> {
        let head_path = self.head_path();
        if !head_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&head_path)
            .with_context(|| format!("Unable to read head file {:?}", head_path))?;

        let captures = regex::Regex::new(HEAD_STATE_REGEX)?
            .captures(&content)
            .with_context(|| format!("Malformed head file {:?}", head_path))?;

        Ok(Some(HeadState {
            branch_name: captures[1].to_string(),
            commit_id: ObjectId::try_parse(captures[2].to_string())?,
        }))
    }

    /// Update the HEAD state to a branch and the commit it points at.
    pub fn write_head(&self, branch_name: &str, commit_id: &ObjectId) -> anyhow::Result<()> {
        let content = format!("branch: {}\nhead: {}\n", branch_name, commit_id);
        self.update_ref_file(&self.head_path(), &content)
    }

    fn update_ref_file(&self, path: &Path, content: &str) -> anyhow::Result<()> {
        let ref_dir = path
            .parent()
            .with_context(|| format!("Invalid ref path {:?}", path))?;
        std::fs::create_dir_all(ref_dir)
            .with_context(|| format!("Unable to create ref directory {:?}", ref_dir))?;

        let temp_path = ref_dir.join(format!("tmp-ref-{}", rand::random::<u32>()));
        std::fs::write(&temp_path, content.as_bytes())
            .with_context(|| format!("Unable to write ref file {:?}", temp_path))?;
        std::fs::rename(&temp_path, path)
            .with_context(|| format!("Unable to rename ref file to {:?}", path))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::OBJECT_ID_LENGTH;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    fn oid(digit: char) -> ObjectId {
        ObjectId::try_parse(digit.to_string().repeat(OBJECT_ID_LENGTH)).unwrap()
    }

    #[fixture]
    fn refs() -> (assert_fs::TempDir, Refs) {
        let dir = assert_fs::TempDir::new().expect("Failed to create temp dir");
        let refs = Refs::new(dir.path().to_path_buf().into_boxed_path());
        (dir, refs)
    }

    #[rstest]
    fn branch_create_read_delete(refs: (assert_fs::TempDir, Refs)) {
        let (_dir, refs) = refs;

        refs.create_branch("master", &oid('1')).unwrap();
        assert!(refs.branch_exists("master"));
        assert_eq!(refs.read_branch("master").unwrap(), Some(oid('1')));

        refs.update_branch("master", &oid('2')).unwrap();
        assert_eq!(refs.read_branch("master").unwrap(), Some(oid('2')));

        refs.delete_branch("master").unwrap();
        assert!(!refs.branch_exists("master"));
        assert_eq!(refs.read_branch("master").unwrap(), None);
    }

    #[rstest]
    fn duplicate_branch_creation_is_rejected(refs: (assert_fs::TempDir, Refs)) {
        let (_dir, refs) = refs;

        refs.create_branch("dev", &oid('1')).unwrap();
        assert!(refs.create_branch("dev", &oid('2')).is_err());
    }

    #[rstest]
    fn branches_list_in_lexicographic_order(refs: (assert_fs::TempDir, Refs)) {
        let (_dir, refs) = refs;

        refs.create_branch("master", &oid('1')).unwrap();
        refs.create_branch("dev", &oid('1')).unwrap();
        refs.create_branch("zeta", &oid('1')).unwrap();

        assert_eq!(refs.list_branches().unwrap(), vec!["dev", "master", "zeta"]);
    }

    #[rstest]
    fn head_state_round_trip(refs: (assert_fs::TempDir, Refs)) {
        let (_dir, refs) = refs;

        assert_eq!(refs.read_head().unwrap(), None);

        refs.write_head("master", &oid('a')).unwrap();
        let head = refs.read_head().unwrap().unwrap();

        assert_eq!(head.branch_name, "master");
        assert_eq!(head.commit_id, oid('a'));
    }
}
