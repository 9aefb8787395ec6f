//! Recursive tree-to-tree diff producing a flat map of path to change.
//!
//! Diffs two tree objects (either of which may be absent, representing an
//! empty tree) by walking their sorted entries in lockstep, recursing into
//! matching subtrees. Unlike a line-level diff, this only reports file-level
//! changes: a path was added, deleted, or its blob/mode updated.

mod tree;

pub use tree::diff_trees;

use std::collections::BTreeMap;

use bstr::BString;
use pit_hash::{HashError, ObjectId};
use pit_object::{ObjectError, TreeEntry};

/// Errors produced while diffing two trees.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    #[error("object {0} not found")]
    ObjectNotFound(ObjectId),

    #[error("expected tree object at {0}, found a different type")]
    NotATree(ObjectId),

    #[error(transparent)]
    Odb(#[from] pit_odb::OdbError),

    #[error(transparent)]
    Object(#[from] ObjectError),

    #[error(transparent)]
    Hash(#[from] HashError),
}

/// A single path-level change between two trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Added(TreeEntry),
    Deleted(TreeEntry),
    Updated(TreeEntry, TreeEntry),
}

impl Change {
    pub fn is_added(&self) -> bool {
        matches!(self, Change::Added(_))
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self, Change::Deleted(_))
    }

    pub fn is_updated(&self) -> bool {
        matches!(self, Change::Updated(_, _))
    }
}

/// The result of diffing two trees: a flat map of repo-relative path to change.
pub type TreeDiff = BTreeMap<BString, Change>;
