use crate::areas::repository::Repository;
use crate::artifacts::core::user_error;
use std::io::Write;

const NO_SUCH_COMMIT: &str = "Found no commit with that message.";

impl Repository {
    /// Print the ids of every commit whose message equals the query
    /// exactly, one per line.
    pub fn find(&mut self, message: &str) -> anyhow::Result<()> {
        let mut matched_ids = Vec::new();
        for commit_id in self.database().list_commit_ids()? {
            let commit = self.database().load_commit(&commit_id)?;
            if commit.message() == message {
                matched_ids.push(commit_id);
            }
        }

        if matched_ids.is_empty() {
            return Err(user_error(NO_SUCH_COMMIT));
        }

        for commit_id in matched_ids {
            writeln!(self.writer(), "{}", commit_id)?;
        }

        Ok(())
    }
}
