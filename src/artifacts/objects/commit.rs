//! Commit object
//!
//! A commit is an immutable snapshot of the tracked tree plus metadata:
//! message, timestamp, up to two parent ids, and the filename-to-blob-id
//! mapping. The second parent is only set on merge commits.
//!
//! ## Format
//!
//! On disk, behind a `commit <size>\0` header, the body is line-oriented:
//!
//! ```text
//! timestamp <unix-seconds> <utc-offset-seconds>
//! parent <40-hex>
//! merge-parent <40-hex>
//! entry <40-hex> <file name>
//!
//! <message>
//! ```
//!
//! The `parent`/`merge-parent` lines are omitted for the initial commit and
//! non-merge commits respectively; `entry` lines appear in file-name order
//! so that serialization, and therefore the commit id, is deterministic.

use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset, Local, TimeZone, Utc};
use std::collections::BTreeMap;
use std::io::BufRead;

/// Message of the sentinel commit created by `init`.
pub const INITIAL_COMMIT_MESSAGE: &str = "initial commit";

/// `Date:` line format of log output (fixed English locale).
const DATE_FORMAT: &str = "%a %b %d %H:%M:%S %Y %z";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    message: String,
    timestamp: DateTime<FixedOffset>,
    parent: Option<ObjectId>,
    merge_parent: Option<ObjectId>,
    tree: BTreeMap<String, ObjectId>,
}

impl Commit {
    pub fn new(
        message: String,
        parent: Option<ObjectId>,
        merge_parent: Option<ObjectId>,
        tree: BTreeMap<String, ObjectId>,
    ) -> Self {
        Commit {
            message,
            timestamp: Local::now().fixed_offset(),
            parent,
            merge_parent,
            tree,
        }
    }

    /// The sentinel commit every repository history starts from: no parents,
    /// an empty tree, and a timestamp pinned to the Unix epoch so that all
    /// repositories share the same initial commit id.
    pub fn initial() -> Self {
        Commit {
            message: INITIAL_COMMIT_MESSAGE.to_string(),
            timestamp: DateTime::<Utc>::UNIX_EPOCH.fixed_offset(),
            parent: None,
            merge_parent: None,
            tree: BTreeMap::new(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn merge_parent(&self) -> Option<&ObjectId> {
        self.merge_parent.as_ref()
    }

    pub fn tree(&self) -> &BTreeMap<String, ObjectId> {
        &self.tree
    }

    /// Look up the blob id a file name maps to in this commit's tree.
    pub fn blob_id(&self, file_name: &str) -> Option<&ObjectId> {
        self.tree.get(file_name)
    }

    pub fn tracks(&self, file_name: &str) -> bool {
        self.tree.contains_key(file_name)
    }

    /// Render this commit as one log entry:
    ///
    /// ```text
    /// ===
    /// commit <40-hex>
    /// Merge: <7-hex> <7-hex>
    /// Date: Thu Jan 01 00:00:00 1970 +0000
    /// <message>
    /// ```
    ///
    /// The `Merge:` line is only present for merge commits. No trailing
    /// newline; the history walker joins entries with blank lines.
    pub fn to_log_entry(&self) -> anyhow::Result<String> {
        let mut lines = vec![];

        lines.push("===".to_string());
        lines.push(format!("commit {}", self.object_id()?));
        if let (Some(parent), Some(merge_parent)) = (&self.parent, &self.merge_parent) {
            lines.push(format!(
                "Merge: {} {}",
                parent.to_short_oid(),
                merge_parent.to_short_oid()
            ));
        }
        lines.push(format!("Date: {}", self.timestamp.format(DATE_FORMAT)));
        lines.push(self.message.clone());

        Ok(lines.join("\n"))
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut fields = vec![];

        fields.push(format!(
            "timestamp {} {}",
            self.timestamp.timestamp(),
            self.timestamp.offset().local_minus_utc()
        ));
        if let Some(parent) = &self.parent {
            fields.push(format!("parent {}", parent));
        }
        if let Some(merge_parent) = &self.merge_parent {
            fields.push(format!("merge-parent {}", merge_parent));
        }
        for (file_name, blob_id) in &self.tree {
            fields.push(format!("entry {} {}", blob_id, file_name));
        }

        let body = format!("{}\n\n{}", fields.join("\n"), self.message);
        let header = format!("{} {}\0", self.object_type().as_str(), body.len());

        Ok(Bytes::from([header.as_bytes(), body.as_bytes()].concat()))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        // the header has already been read
        let mut body = String::new();
        reader.read_to_string(&mut body)?;

        let (fields, message) = body
            .split_once("\n\n")
            .context("Invalid commit object: missing message separator")?;

        let mut timestamp = None;
        let mut parent = None;
        let mut merge_parent = None;
        let mut tree = BTreeMap::new();

        for line in fields.lines() {
            let (key, value) = line
                .split_once(' ')
                .context("Invalid commit object: malformed field line")?;

            match key {
                "timestamp" => {
                    let (seconds, offset_seconds) = value
                        .split_once(' ')
                        .context("Invalid commit object: malformed timestamp")?;
                    let seconds: i64 = seconds.parse()?;
                    let offset_seconds: i32 = offset_seconds.parse()?;

                    let offset = FixedOffset::east_opt(offset_seconds)
                        .context("Invalid commit object: timezone offset out of range")?;
                    timestamp = offset
                        .timestamp_opt(seconds, 0)
                        .single()
                        .context("Invalid commit object: timestamp out of range")?
                        .into();
                }
                "parent" => parent = Some(ObjectId::try_parse(value.to_string())?),
                "merge-parent" => merge_parent = Some(ObjectId::try_parse(value.to_string())?),
                "entry" => {
                    anyhow::ensure!(
                        value.len() > OBJECT_ID_LENGTH + 1,
                        "Invalid commit object: malformed tree entry"
                    );
                    let (blob_id, file_name) = value.split_at(OBJECT_ID_LENGTH);
                    let file_name = file_name
                        .strip_prefix(' ')
                        .context("Invalid commit object: malformed tree entry")?;
                    tree.insert(
                        file_name.to_string(),
                        ObjectId::try_parse(blob_id.to_string())?,
                    );
                }
                _ => anyhow::bail!("Invalid commit object: unknown field {}", key),
            }
        }

        Ok(Commit {
            message: message.to_string(),
            timestamp: timestamp.context("Invalid commit object: missing timestamp")?,
            parent,
            merge_parent,
            tree,
        })
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        self.to_log_entry().unwrap_or_default()
    }
}

/// Borrowed view of a commit used by graph-walk algorithms.
///
/// Holds only what a traversal needs: the commit's id and its parent ids in
/// parent-then-merge-parent order, borrowed from a commit cache.
#[derive(Debug, Clone)]
pub struct SlimCommit<'c> {
    pub oid: &'c ObjectId,
    pub parents: &'c [ObjectId],
}
