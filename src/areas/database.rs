//! Object database
//!
//! The database stores all repository objects (blobs and commits) using
//! content-addressable storage. Objects are identified by their SHA-1 hash
//! and kept in per-type directories, each object file named by its full
//! 40-hex id:
//!
//! - `.gitlet/blobs/<blob-id>`
//! - `.gitlet/commits/<commit-id>`
//!
//! Contents are zlib-compressed. Writes go to a temporary name first and are
//! renamed into place, so a reader never observes a partially written
//! object and an interrupted command leaves at worst an unreferenced file.

use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::{Commit, SlimCommit};
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use rand;
use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

/// Cached commit data for efficient borrowing during graph traversal.
#[derive(Debug, Clone)]
struct CachedCommit {
    oid: ObjectId,
    parents: Vec<ObjectId>,
}

/// Content-addressed object store
#[derive(Debug)]
pub struct Database {
    /// Path to the repository state directory (`.gitlet`)
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn blobs_path(&self) -> PathBuf {
        self.path.join("blobs")
    }

    pub fn commits_path(&self) -> PathBuf {
        self.path.join("commits")
    }

    fn object_path(&self, object_type: ObjectType, object_id: &ObjectId) -> PathBuf {
        let dir = match object_type {
            ObjectType::Blob => self.blobs_path(),
            ObjectType::Commit => self.commits_path(),
        };
        dir.join(object_id.as_ref())
    }

    /// Store an object, returning its id.
    ///
    /// The object is serialized, compressed, and written to the path derived
    /// from its SHA-1 hash. If an object with that id already exists this is
    /// a no-op, which is what makes blob deduplication fall out for free.
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_id = object.object_id()?;
        let object_path = self.object_path(object.object_type(), &object_id);

        if !object_path.exists() {
            let object_content = object.serialize()?;
            self.write_object(object_path, object_content)?;
        }

        Ok(object_id)
    }

    /// Load a blob by id. A tracked blob that cannot be loaded is an
    /// internal inconsistency, not a user error.
    pub fn load_blob(&self, object_id: &ObjectId) -> anyhow::Result<Blob> {
        let object_path = self.object_path(ObjectType::Blob, object_id);
        let (object_type, object_reader) = self.parse_object_as_bytes(object_path)?;

        anyhow::ensure!(
            object_type == ObjectType::Blob,
            "Object {} is not a blob",
            object_id
        );
        Blob::deserialize(object_reader)
    }

    /// Load a commit by full id. Missing commits referenced by refs or
    /// parent links are internal inconsistencies, not user errors.
    pub fn load_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        let object_path = self.object_path(ObjectType::Commit, object_id);
        let (object_type, object_reader) = self.parse_object_as_bytes(object_path)?;

        anyhow::ensure!(
            object_type == ObjectType::Commit,
            "Object {} is not a commit",
            object_id
        );
        Commit::deserialize(object_reader)
    }

    pub fn contains_commit(&self, object_id: &ObjectId) -> bool {
        self.object_path(ObjectType::Commit, object_id).exists()
    }

    /// Resolve a possibly abbreviated commit id.
    ///
    /// A full 40-hex id resolves by direct lookup. A shorter prefix is
    /// matched against every stored commit id; the match must be unique.
    /// Returns `None` for no match, an ambiguous prefix, or a string that is
    /// not a hex prefix at all.
    pub fn resolve_commit_id(&self, reference: &str) -> anyhow::Result<Option<ObjectId>> {
        if reference.is_empty()
            || reference.len() > OBJECT_ID_LENGTH
            || !reference.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Ok(None);
        }

        let reference = reference.to_lowercase();
        if reference.len() == OBJECT_ID_LENGTH {
            let object_id = ObjectId::try_parse(reference)?;
            return Ok(self.contains_commit(&object_id).then_some(object_id));
        }

        let mut matches = self
            .list_commit_ids()?
            .into_iter()
            .filter(|object_id| object_id.as_ref().starts_with(&reference));

        match (matches.next(), matches.next()) {
            (Some(object_id), None) => Ok(Some(object_id)),
            // zero matches, or an ambiguous prefix
            _ => Ok(None),
        }
    }

    /// List every stored commit id, in lexicographic order.
    pub fn list_commit_ids(&self) -> anyhow::Result<Vec<ObjectId>> {
        let commits_path = self.commits_path();
        let mut commit_ids = std::fs::read_dir(&commits_path)
            .with_context(|| format!("Unable to list commit directory {:?}", commits_path))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| ObjectId::try_parse(entry.file_name().to_string_lossy().into()).ok())
            .collect::<Vec<_>>();
        commit_ids.sort();

        Ok(commit_ids)
    }

    fn parse_object_as_bytes(
        &self,
        object_path: PathBuf,
    ) -> anyhow::Result<(ObjectType, impl std::io::BufRead)> {
        let object_content = self.read_object(object_path)?;
        let mut object_reader = Cursor::new(object_content);

        let object_type = ObjectType::parse_object_type(&mut object_reader)?;

        Ok((object_type, object_reader))
    }

    fn read_object(&self, object_path: PathBuf) -> anyhow::Result<Bytes> {
        let object_content = std::fs::read(&object_path).with_context(|| {
            format!("Unable to read object file {}", object_path.display())
        })?;

        Self::decompress(object_content.into())
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .with_context(|| format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)
            .with_context(|| {
                format!("Unable to open object file {}", temp_object_path.display())
            })?;

        file.write_all(&object_content).with_context(|| {
            format!("Unable to write object file {}", temp_object_path.display())
        })?;

        // rename the temp file to the object file to make the write atomic
        std::fs::rename(&temp_object_path, &object_path).with_context(|| {
            format!("Unable to rename object file to {}", object_path.display())
        })?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}

/// Commit cache for graph traversal algorithms
///
/// Stores loaded commits so that `SlimCommit` instances can borrow from the
/// cache instead of owning their data. Split-point discovery visits the same
/// commits repeatedly; the cache keeps that to one database read per commit.
#[derive(Debug, Default)]
pub struct CommitCache {
    commits: HashMap<ObjectId, CachedCommit>,
}

impl CommitCache {
    pub fn new() -> Self {
        Self {
            commits: HashMap::new(),
        }
    }

    /// Load a commit into the cache if not already present.
    pub fn load_commit(&mut self, database: &Database, object_id: &ObjectId) -> anyhow::Result<()> {
        if self.commits.contains_key(object_id) {
            return Ok(());
        }

        let commit = database.load_commit(object_id)?;
        let cached = CachedCommit {
            oid: object_id.clone(),
            parents: commit
                .parent()
                .into_iter()
                .chain(commit.merge_parent())
                .cloned()
                .collect(),
        };

        self.commits.insert(object_id.clone(), cached);
        Ok(())
    }

    /// Load a commit and everything reachable from it through parent links.
    pub fn load_ancestry(
        &mut self,
        database: &Database,
        object_id: &ObjectId,
    ) -> anyhow::Result<()> {
        let mut pending = vec![object_id.clone()];

        while let Some(commit_id) = pending.pop() {
            if self.commits.contains_key(&commit_id) {
                continue;
            }
            self.load_commit(database, &commit_id)?;
            pending.extend(self.commits[&commit_id].parents.iter().cloned());
        }

        Ok(())
    }

    /// Get a `SlimCommit` that borrows from this cache.
    ///
    /// The commit must already be loaded via `load_commit`/`load_ancestry`.
    pub fn get_slim_commit(&'_ self, object_id: &ObjectId) -> anyhow::Result<SlimCommit<'_>> {
        let cached = self
            .commits
            .get(object_id)
            .ok_or_else(|| anyhow::anyhow!("Commit {} not found in cache", object_id))?;

        Ok(SlimCommit {
            oid: &cached.oid,
            parents: &cached.parents,
        })
    }
}
