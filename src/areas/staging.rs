//! Staging area
//!
//! The staging area is the pending delta forming the next commit: a map of
//! additions (file name to blob id) and a set of removals. Both are cleared
//! by `commit`, `checkout <branch>`, and `reset`.
//!
//! ## File Format
//!
//! Persisted to `.gitlet/stagingArea` as:
//! - Header: signature, format version, addition count, removal count
//! - Addition entries: length-prefixed file name + 20-byte blob id
//! - Removal entries: length-prefixed file name
//! - Checksum: SHA-1 hash of everything above, for integrity verification
//!
//! All integers are big-endian. The two sets are kept disjoint by the
//! mutators: staging an addition drops any pending removal of the same name
//! and vice versa.

use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use sha1::{Digest, Sha1};
use std::collections::{BTreeMap, BTreeSet};
use std::io::{Cursor, Read, Write};
use std::ops::DerefMut;
use std::path::Path;

const SIGNATURE: &[u8; 4] = b"GSTG";
const VERSION: u32 = 1;
const CHECKSUM_SIZE: usize = 20;

/// Staging area (pending additions and removals)
#[derive(Debug, Clone)]
pub struct StagingArea {
    /// Path to the staging file (`.gitlet/stagingArea`)
    path: Box<Path>,
    /// Files staged for addition, mapped to their blob ids
    additions: BTreeMap<String, ObjectId>,
    /// Files staged for removal
    removals: BTreeSet<String>,
}

impl StagingArea {
    pub fn new(path: Box<Path>) -> Self {
        StagingArea {
            path,
            additions: BTreeMap::new(),
            removals: BTreeSet::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn additions(&self) -> &BTreeMap<String, ObjectId> {
        &self.additions
    }

    pub fn removals(&self) -> &BTreeSet<String> {
        &self.removals
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }

    pub fn is_staged_for_addition(&self, file_name: &str) -> bool {
        self.additions.contains_key(file_name)
    }

    pub fn is_staged_for_removal(&self, file_name: &str) -> bool {
        self.removals.contains(file_name)
    }

    pub fn staged_blob_id(&self, file_name: &str) -> Option<&ObjectId> {
        self.additions.get(file_name)
    }

    /// Record an addition, replacing any previous entry for the name and
    /// dropping a pending removal of it.
    pub fn stage_addition(&mut self, file_name: &str, blob_id: ObjectId) {
        self.removals.remove(file_name);
        self.additions.insert(file_name.to_string(), blob_id);
    }

    /// Drop a pending addition. Returns whether one was present.
    pub fn unstage_addition(&mut self, file_name: &str) -> bool {
        self.additions.remove(file_name).is_some()
    }

    /// Record a removal, dropping a pending addition of the same name.
    pub fn stage_removal(&mut self, file_name: &str) {
        self.additions.remove(file_name);
        self.removals.insert(file_name.to_string());
    }

    /// Drop a pending removal. Returns whether one was present.
    pub fn unstage_removal(&mut self, file_name: &str) -> bool {
        self.removals.remove(file_name)
    }

    pub fn clear(&mut self) {
        self.additions.clear();
        self.removals.clear();
    }

    /// Load the staging area from disk.
    ///
    /// Reads the staging file, verifies the checksum, and replaces the
    /// in-memory state. A missing or empty file loads as an empty staging
    /// area.
    ///
    /// # Locking
    ///
    /// Acquires a shared lock on the staging file during reading.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.clear();

        if !self.path.exists() {
            return Ok(());
        }

        let mut staging_file = std::fs::OpenOptions::new().read(true).open(&self.path)?;
        let mut lock = file_guard::lock(&mut staging_file, file_guard::Lock::Shared, 0, 1)?;

        let mut content = Vec::new();
        lock.deref_mut().read_to_end(&mut content)?;

        if content.is_empty() {
            return Ok(());
        }

        self.parse(&content)
    }

    /// Persist the staging area.
    ///
    /// The serialized state is written to a temporary name and renamed into
    /// place, so a reader never observes a torn staging file.
    pub fn save(&self) -> anyhow::Result<()> {
        let staging_dir = self
            .path
            .parent()
            .with_context(|| format!("Invalid staging path {:?}", self.path))?;
        let temp_path = staging_dir.join("stagingArea.tmp");

        let content = self.assemble()?;
        std::fs::write(&temp_path, &content)
            .with_context(|| format!("Unable to write staging file {:?}", temp_path))?;
        std::fs::rename(&temp_path, &self.path)
            .with_context(|| format!("Unable to rename staging file to {:?}", self.path))?;

        Ok(())
    }

    fn assemble(&self) -> anyhow::Result<Vec<u8>> {
        let mut content = Vec::new();

        content.write_all(SIGNATURE)?;
        content.write_u32::<BigEndian>(VERSION)?;
        content.write_u32::<BigEndian>(self.additions.len() as u32)?;
        content.write_u32::<BigEndian>(self.removals.len() as u32)?;

        for (file_name, blob_id) in &self.additions {
            Self::write_file_name(&mut content, file_name)?;
            blob_id.write_h40_to(&mut content)?;
        }
        for file_name in &self.removals {
            Self::write_file_name(&mut content, file_name)?;
        }

        let checksum = Sha1::digest(&content);
        content.write_all(&checksum)?;

        Ok(content)
    }

    fn parse(&mut self, content: &[u8]) -> anyhow::Result<()> {
        anyhow::ensure!(
            content.len() > CHECKSUM_SIZE,
            "Staging file is truncated: {} bytes",
            content.len()
        );

        let (body, stored_checksum) = content.split_at(content.len() - CHECKSUM_SIZE);
        let checksum = Sha1::digest(body);
        anyhow::ensure!(
            checksum.as_slice() == stored_checksum,
            "Staging file checksum mismatch"
        );

        let mut reader = Cursor::new(body);

        let mut signature = [0u8; 4];
        reader.read_exact(&mut signature)?;
        anyhow::ensure!(&signature == SIGNATURE, "Invalid staging file signature");

        let version = reader.read_u32::<BigEndian>()?;
        anyhow::ensure!(version == VERSION, "Unsupported staging version {version}");

        let additions_count = reader.read_u32::<BigEndian>()?;
        let removals_count = reader.read_u32::<BigEndian>()?;

        for _ in 0..additions_count {
            let file_name = Self::read_file_name(&mut reader)?;
            let blob_id = ObjectId::read_h40_from(&mut reader)?;
            self.additions.insert(file_name, blob_id);
        }
        for _ in 0..removals_count {
            let file_name = Self::read_file_name(&mut reader)?;
            self.removals.insert(file_name);
        }

        Ok(())
    }

    fn write_file_name(writer: &mut impl Write, file_name: &str) -> anyhow::Result<()> {
        let bytes = file_name.as_bytes();
        anyhow::ensure!(
            bytes.len() <= u16::MAX as usize,
            "File name too long to stage: {}",
            file_name
        );

        writer.write_u16::<BigEndian>(bytes.len() as u16)?;
        writer.write_all(bytes)?;
        Ok(())
    }

    fn read_file_name(reader: &mut impl Read) -> anyhow::Result<String> {
        let length = reader.read_u16::<BigEndian>()? as usize;
        let mut bytes = vec![0u8; length];
        reader.read_exact(&mut bytes)?;

        String::from_utf8(bytes).context("Staged file name is not valid UTF-8")
    }
}
