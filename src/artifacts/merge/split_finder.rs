//! Split-point discovery for three-way merges
//!
//! The split point of two branch heads is their latest common ancestor in
//! the commit DAG: a common ancestor that is not an ancestor of any other
//! common ancestor. It determines the base commit against which the merge
//! classifies every file.
//!
//! ## Algorithm
//!
//! A breadth-first walk from each head over both parent links builds a
//! depth map (head = 0, parents = 1, ...). The split point is the commit
//! present in both maps with minimal depth on the current-branch side.
//! Because BFS visits commits in non-decreasing depth and parents in
//! parent-then-merge-parent order, scanning the current side's visit order
//! for the first commit known to the other side yields that minimum, with
//! ties broken deterministically by insertion order.
//!
//! In histories where several common ancestors share the minimal depth
//! (criss-cross merges), any of them satisfies the merge; the traversal
//! order makes the choice reproducible.

use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::{HashMap, VecDeque};

/// Finds the split point between two commits
///
/// Generic over a function that loads `SlimCommit` data for any commit id,
/// so it works against the on-disk database (through a commit cache) as
/// well as in-memory stores in tests.
pub struct SplitPointFinder<'c, CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> SlimCommit<'c>,
{
    /// Function to load commit data for any given commit id
    commit_loader: CommitLoaderFn,
    _marker: std::marker::PhantomData<&'c ()>,
}

impl<'c, CommitLoaderFn> SplitPointFinder<'c, CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> SlimCommit<'c>,
{
    /// Creates a new finder with the given commit loader function.
    ///
    /// The loader must return a `SlimCommit` with an empty parents slice
    /// for root commits.
    pub fn new(commit_loader: CommitLoaderFn) -> Self {
        Self {
            commit_loader,
            _marker: std::marker::PhantomData,
        }
    }

    /// Find the split point of `current` and `other`.
    ///
    /// Returns `None` only when the commits share no history at all, which
    /// cannot happen for two branches of one repository (every history
    /// starts at the initial commit).
    pub fn find_split_point(&self, current: &ObjectId, other: &ObjectId) -> Option<ObjectId> {
        let (current_order, _) = self.ancestry_depths(current);
        let (_, other_depths) = self.ancestry_depths(other);

        current_order
            .into_iter()
            .find(|commit_id| other_depths.contains_key(commit_id))
    }

    /// Walk the ancestry of `start` breadth-first over both parent links.
    ///
    /// Returns the visit order and the depth of each reachable commit
    /// (`start` itself has depth 0).
    fn ancestry_depths(&self, start: &ObjectId) -> (Vec<ObjectId>, HashMap<ObjectId, usize>) {
        let mut order = Vec::new();
        let mut depths = HashMap::new();
        let mut queue = VecDeque::new();

        depths.insert(start.clone(), 0);
        queue.push_back(start.clone());

        while let Some(commit_id) = queue.pop_front() {
            let depth = depths[&commit_id];
            order.push(commit_id.clone());

            let commit = (self.commit_loader)(&commit_id);
            for parent_id in commit.parents {
                if !depths.contains_key(parent_id) {
                    depths.insert(parent_id.clone(), depth + 1);
                    queue.push_back(parent_id.clone());
                }
            }
        }

        (order, depths)
    }
}
