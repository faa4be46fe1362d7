use crate::areas::repository::Repository;
use std::io::Write;

impl Repository {
    /// Print the commit history starting at the head commit, following
    /// first-parent links only (second parents of merge commits are not
    /// traversed), newest first.
    pub fn log(&mut self) -> anyhow::Result<()> {
        let head = self.head_state()?;

        let mut entries = Vec::new();
        let mut next = Some(head.commit_id);
        while let Some(commit_id) = next {
            let commit = self.database().load_commit(&commit_id)?;
            entries.push(commit.to_log_entry()?);
            next = commit.parent().cloned();
        }

        writeln!(self.writer(), "{}\n", entries.join("\n\n"))?;

        Ok(())
    }
}
