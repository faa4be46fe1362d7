use crate::areas::repository::Repository;
use crate::artifacts::core::user_error;
use crate::artifacts::objects::object::Object;

const NO_SUCH_FILE: &str = "File does not exist.";

impl Repository {
    /// Stage a copy of the file as it currently exists in the working
    /// directory.
    ///
    /// Staging an already-staged file overwrites the previous entry. If the
    /// working version is identical to the version in the head commit, the
    /// file is not staged and any stale entry for it is dropped (a file
    /// changed, added, and changed back). A pending removal of the file is
    /// cancelled in every case.
    pub fn add(&mut self, file_name: &str) -> anyhow::Result<()> {
        if !self.workspace().contains(file_name) {
            return Err(user_error(NO_SUCH_FILE));
        }

        let head_commit = self.head_commit()?;
        let blob = self.workspace().parse_blob(file_name)?;
        let blob_id = blob.object_id()?;

        let staging = self.staging();
        let mut staging = staging.borrow_mut();
        staging.rehydrate()?;

        staging.unstage_removal(file_name);

        if head_commit.blob_id(file_name) == Some(&blob_id) {
            staging.unstage_addition(file_name);
        } else {
            // the blob must be durable before the staging area references it
            self.database().store(&blob)?;
            staging.stage_addition(file_name, blob_id);
        }

        staging.save()
    }
}
