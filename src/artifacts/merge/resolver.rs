//! Per-file resolution for three-way merges
//!
//! Once the split point is known, every file in the union of the three
//! trees (split, current head, other head) is classified independently by
//! comparing the blob ids each tree maps it to. Equal content means equal
//! blob ids, so no file contents are read during classification.
//!
//! The classification implements the eight merge cases:
//!
//! 1. modified only in other            -> take other's version, stage it
//! 2. modified only in current          -> keep
//! 3. modified identically on both sides (or removed on both) -> keep
//! 4. added only in current             -> keep
//! 5. added only in other               -> take other's version, stage it
//! 6. removed in other, unchanged here  -> stage removal, delete from WD
//! 7. removed here, unchanged in other  -> keep (stays absent)
//! 8. changed in conflicting ways       -> write conflict markers, stage
//!
//! A deleted side in a conflict is treated as an empty file.

use crate::artifacts::objects::object_id::ObjectId;

/// What the merge does with one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeAction {
    /// Leave the working directory and staging area alone for this file.
    Keep,
    /// Check out the other branch's blob and stage it.
    TakeOther,
    /// Stage the file for removal and delete it from the working directory.
    Remove,
    /// Write the conflict blob to the working directory and stage it.
    Conflict,
}

/// Classify one file by its blob ids at the split point and in the two
/// branch heads (`None` = the tree does not contain the file).
pub fn classify(
    split: Option<&ObjectId>,
    current: Option<&ObjectId>,
    other: Option<&ObjectId>,
) -> MergeAction {
    match (split, current, other) {
        // present everywhere
        (Some(split), Some(current), Some(other)) if current == split && other != split => {
            MergeAction::TakeOther
        }
        (Some(split), Some(current), Some(other)) if current != split && other == split => {
            MergeAction::Keep
        }
        (Some(_), Some(current), Some(other)) if current == other => MergeAction::Keep,
        (Some(_), Some(_), Some(_)) => MergeAction::Conflict,

        // removed in other
        (Some(split), Some(current), None) if current == split => MergeAction::Remove,
        (Some(_), Some(_), None) => MergeAction::Conflict,

        // removed in current
        (Some(split), None, Some(other)) if other == split => MergeAction::Keep,
        (Some(_), None, Some(_)) => MergeAction::Conflict,

        // removed on both sides
        (Some(_), None, None) => MergeAction::Keep,

        // absent at the split point
        (None, Some(current), Some(other)) if current == other => MergeAction::Keep,
        (None, Some(_), Some(_)) => MergeAction::Conflict,
        (None, Some(_), None) => MergeAction::Keep,
        (None, None, Some(_)) => MergeAction::TakeOther,
        (None, None, None) => MergeAction::Keep,
    }
}

/// Assemble the conflict blob: both versions concatenated as-is between the
/// marker lines, an absent side contributing the empty string.
pub fn conflict_content(current: Option<&str>, other: Option<&str>) -> String {
    let mut content = String::from("<<<<<<< HEAD\n");
    if let Some(current) = current {
        content.push_str(current);
    }
    content.push_str("=======\n");
    if let Some(other) = other {
        content.push_str(other);
    }
    content.push_str(">>>>>>>\n");

    content
}
