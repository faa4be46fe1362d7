use crate::areas::repository::Repository;
use crate::artifacts::core::user_error;

const NOTHING_TO_REMOVE: &str = "No reason to remove the file.";

impl Repository {
    /// Unstage the file if it is staged for addition. If the head commit
    /// tracks it, stage it for removal and delete it from the working
    /// directory (the user may already have done so).
    pub fn rm(&mut self, file_name: &str) -> anyhow::Result<()> {
        let head_commit = self.head_commit()?;

        let staging = self.staging();
        let mut staging = staging.borrow_mut();
        staging.rehydrate()?;

        if !head_commit.tracks(file_name)
            && !staging.is_staged_for_addition(file_name)
            && !staging.is_staged_for_removal(file_name)
        {
            return Err(user_error(NOTHING_TO_REMOVE));
        }

        staging.unstage_addition(file_name);
        if head_commit.tracks(file_name) {
            staging.stage_removal(file_name);
            self.workspace().remove_file(file_name)?;
        }

        staging.save()
    }
}
