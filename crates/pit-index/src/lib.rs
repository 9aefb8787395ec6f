//! Binary staging index: loading, mutation, and serialization of `.git/index`.

pub mod entry;
mod read;
mod write;

pub use entry::{IndexEntry, StatData};
pub use read::parse_index;

use std::path::Path;

use bstr::{BString, ByteSlice};
use pit_hash::ObjectId;
use pit_object::FileMode;
use pit_utils::write_atomic;

/// Errors produced by index operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("invalid index header: {0}")]
    InvalidHeader(String),

    #[error("unsupported index version: {0}")]
    UnsupportedVersion(u32),

    #[error("invalid index entry at offset {offset}: {reason}")]
    InvalidEntry { offset: usize, reason: String },

    #[error("index checksum mismatch")]
    ChecksumMismatch,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Util(#[from] pit_utils::UtilError),
}

/// The staging index: a sorted, deduplicated set of tracked path entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Index {
    pub entries: Vec<IndexEntry>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the index at `path`. A missing file yields an empty index
    /// (version 2, zero entries), matching a freshly initialized repository.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, IndexError> {
        let path = path.as_ref();
        match std::fs::read(path) {
            Ok(data) => parse_index(&data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(IndexError::Io(e)),
        }
    }

    /// Serialize and write atomically to `path`.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), IndexError> {
        write_atomic(path, &self.serialize())?;
        Ok(())
    }

    pub fn find(&self, path: &[u8]) -> Option<&IndexEntry> {
        self.entries.iter().find(|e| e.path.as_slice() == path)
    }

    fn find_index(&self, path: &[u8]) -> Option<usize> {
        self.entries.iter().position(|e| e.path.as_slice() == path)
    }

    /// Insert or overwrite the entry for `path`. Any existing entry that is a
    /// parent directory of `path`, or that lies under `path` as a directory
    /// prefix, is removed first to preserve the prefix-collision invariant.
    pub fn add_entry(&mut self, path: impl Into<BString>, oid: ObjectId, mode: FileMode, stat: StatData) {
        let path: BString = path.into();
        self.remove_conflicting(&path);

        match self.find_index(&path) {
            Some(idx) => {
                self.entries[idx] = IndexEntry::new(path, oid, mode, stat);
            }
            None => {
                self.entries.push(IndexEntry::new(path, oid, mode, stat));
                self.entries.sort_by(|a, b| a.path.cmp(&b.path));
            }
        }
    }

    fn remove_conflicting(&mut self, path: &BString) {
        let path_bytes: &[u8] = path.as_ref();
        self.entries.retain(|e| {
            let other: &[u8] = e.path.as_ref();
            if other == path_bytes {
                return true; // handled separately by overwrite/insert
            }
            let other_is_parent_dir = path_bytes.starts_with(other) && path_bytes[other.len()..].starts_with(b"/");
            let path_is_parent_dir = other.starts_with(path_bytes) && other[path_bytes.len()..].starts_with(b"/");
            !other_is_parent_dir && !path_is_parent_dir
        });
    }

    pub fn remove_entry(&mut self, path: &[u8]) {
        self.entries.retain(|e| e.path.as_slice() != path);
    }

    /// True if `path` is tracked directly or is a directory prefix of a
    /// tracked path.
    pub fn has_tracked(&self, path: &[u8]) -> bool {
        self.entries.iter().any(|e| {
            let other: &[u8] = e.path.as_ref();
            other == path || (other.starts_with(path) && other[path.len()..].starts_with(b"/"))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter()
    }

    /// Check whether the tracked entry at `path` differs from its working-tree
    /// counterpart, rooted at `repo_root`.
    ///
    /// Stat comparison is a fast-path short circuit; if stat data differs (or
    /// the mode differs) the blob hash is recomputed and is the ground truth.
    pub fn has_modified(&self, repo_root: &Path, path: &[u8]) -> Result<bool, IndexError> {
        let entry = match self.find(path) {
            Some(e) => e,
            None => return Ok(false),
        };

        let fs_path = repo_root.join(path.to_str_lossy().as_ref());
        let metadata = match std::fs::metadata(&fs_path) {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(true),
            Err(e) => return Err(IndexError::Io(e)),
        };

        let current_mode = if metadata.is_dir() {
            FileMode::Directory
        } else if is_executable(&metadata) {
            FileMode::Executable
        } else {
            FileMode::Regular
        };

        if entry.mode != current_mode || !entry.stat.matches(&metadata) {
            let content = std::fs::read(&fs_path)?;
            let blob_oid = pit_object::Object::Blob(pit_object::Blob::new(content)).compute_oid();
            return Ok(blob_oid != entry.oid || entry.mode != current_mode);
        }

        Ok(false)
    }
}

#[cfg(unix)]
fn is_executable(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &std::fs::Metadata) -> bool {
    false
}
