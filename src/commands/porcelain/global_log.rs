use crate::areas::repository::Repository;
use std::io::Write;

impl Repository {
    /// Like `log`, but over every commit ever made, in stored-id order.
    pub fn global_log(&mut self) -> anyhow::Result<()> {
        let mut entries = Vec::new();
        for commit_id in self.database().list_commit_ids()? {
            let commit = self.database().load_commit(&commit_id)?;
            entries.push(commit.to_log_entry()?);
        }

        writeln!(self.writer(), "{}\n", entries.join("\n\n"))?;

        Ok(())
    }
}
