//! Core object traits
//!
//! This module defines the fundamental traits that all repository objects
//! implement:
//! - `Packable`: serialization to the on-disk format
//! - `Unpackable`: deserialization from the on-disk format
//! - `Object`: common object operations (id computation, display)
//!
//! ## Object Format
//!
//! All objects are stored as:
//! ```text
//! <type> <size>\0<content>
//! ```
//! then compressed with zlib and written under `.gitlet/blobs/` or
//! `.gitlet/commits/` keyed by their id. The id is the SHA-1 hash of the
//! serialized bytes, so identical content maps to one stored object.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Result;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::BufRead;

/// Trait for serializing objects to the on-disk binary format
pub trait Packable {
    /// Serialize the object to bytes (including header)
    fn serialize(&self) -> Result<Bytes>;
}

/// Trait for deserializing objects from the on-disk binary format
pub trait Unpackable {
    /// Deserialize the object from a reader (header already consumed)
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

/// Core repository object trait
///
/// Implemented by both object types (Blob, Commit).
pub trait Object: Packable {
    /// Get the object's type
    fn object_type(&self) -> ObjectType;

    /// Get a human-readable representation
    fn display(&self) -> String;

    /// Compute the object id (SHA-1 hash)
    ///
    /// The id is computed by hashing the serialized content, which makes it
    /// a pure function of the object's fields.
    fn object_id(&self) -> Result<ObjectId> {
        let content = self.serialize()?;
        let mut hasher = Sha1::new();
        hasher.update(&content);

        let oid = hasher.finalize();
        ObjectId::try_parse(format!("{oid:x}"))
    }
}
