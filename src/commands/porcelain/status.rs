use crate::areas::repository::Repository;
use crate::artifacts::status::inspector::Inspector;
use std::io::Write;

impl Repository {
    /// Print the branches and the state of every file: staged, removed,
    /// modified-but-not-staged, and untracked, each section in
    /// lexicographic order and followed by one blank line.
    pub fn status(&mut self) -> anyhow::Result<()> {
        {
            let staging = self.staging();
            let mut staging = staging.borrow_mut();
            staging.rehydrate()?;
        }

        let report = Inspector::new(self).status_report()?;
        let head = self.head_state()?;
        let branch_names = self.refs().list_branches()?;

        let mut writer = self.writer();

        writeln!(writer, "=== Branches ===")?;
        for branch_name in &branch_names {
            if *branch_name == head.branch_name {
                writeln!(writer, "*{}", branch_name)?;
            } else {
                writeln!(writer, "{}", branch_name)?;
            }
        }
        writeln!(writer)?;

        writeln!(writer, "=== Staged Files ===")?;
        for file_name in &report.staged {
            writeln!(writer, "{}", file_name)?;
        }
        writeln!(writer)?;

        writeln!(writer, "=== Removed Files ===")?;
        for file_name in &report.removed {
            writeln!(writer, "{}", file_name)?;
        }
        writeln!(writer)?;

        writeln!(writer, "=== Modifications Not Staged For Commit ===")?;
        for entry in &report.modifications {
            writeln!(writer, "{}", entry)?;
        }
        writeln!(writer)?;

        writeln!(writer, "=== Untracked Files ===")?;
        for file_name in &report.untracked {
            writeln!(writer, "{}", file_name)?;
        }
        writeln!(writer)?;

        Ok(())
    }
}
