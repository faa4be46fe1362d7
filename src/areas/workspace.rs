//! Working directory access
//!
//! The workspace is the untyped filesystem view outside `.gitlet/`. Only
//! plain files directly under the repository root participate in version
//! control; directories are never tracked.

use crate::artifacts::objects::blob::Blob;
use anyhow::Context;
use std::io::Write;
use std::path::Path;

const IGNORED_PATHS: [&str; 3] = [".gitlet", ".", ".."];

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// List the plain file names in the working directory, ignored entries
    /// excluded, in lexicographic order.
    pub fn list_files(&self) -> anyhow::Result<Vec<String>> {
        let mut file_names = std::fs::read_dir(&self.path)
            .with_context(|| format!("Unable to list working directory {:?}", self.path))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                let file_name = entry.file_name().to_string_lossy().to_string();
                if IGNORED_PATHS.contains(&file_name.as_str()) {
                    None
                } else {
                    Some(file_name)
                }
            })
            .collect::<Vec<_>>();
        file_names.sort();

        Ok(file_names)
    }

    pub fn contains(&self, file_name: &str) -> bool {
        self.path.join(file_name).is_file()
    }

    pub fn read_file(&self, file_name: &str) -> anyhow::Result<String> {
        let file_path = self.path.join(file_name);

        std::fs::read_to_string(&file_path)
            .with_context(|| format!("Unable to read file {:?}", file_path))
    }

    /// Read a working file and wrap its content as an unstored blob.
    pub fn parse_blob(&self, file_name: &str) -> anyhow::Result<Blob> {
        let content = self.read_file(file_name)?;
        Ok(Blob::new(content))
    }

    /// Write a file, replacing any existing content.
    pub fn write_file(&self, file_name: &str, content: &str) -> anyhow::Result<()> {
        let file_path = self.path.join(file_name);

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&file_path)
            .with_context(|| format!("Unable to open file {:?}", file_path))?;
        file.write_all(content.as_bytes())
            .with_context(|| format!("Unable to write file {:?}", file_path))?;

        Ok(())
    }

    /// Delete a file. Missing files are fine; the caller may be removing
    /// something the user already deleted by hand.
    pub fn remove_file(&self, file_name: &str) -> anyhow::Result<()> {
        let file_path = self.path.join(file_name);

        match std::fs::remove_file(&file_path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => {
                Err(error).with_context(|| format!("Unable to remove file {:?}", file_path))
            }
        }
    }
}
