use bstr::BString;
use pit_hash::ObjectId;
use pit_object::FileMode;

use crate::IndexError;

/// A single entry in the staging index: a tracked blob plus the stat
/// metadata captured the last time it was written to the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub path: BString,
    pub oid: ObjectId,
    pub mode: FileMode,
    pub stat: StatData,
}

impl IndexEntry {
    pub fn new(path: impl Into<BString>, oid: ObjectId, mode: FileMode, stat: StatData) -> Self {
        Self {
            path: path.into(),
            oid,
            mode,
            stat,
        }
    }
}

/// File system stat data cached alongside an index entry, used as a fast
/// path for detecting whether a tracked file has changed on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatData {
    pub ctime_secs: u32,
    pub ctime_nsecs: u32,
    pub mtime_secs: u32,
    pub mtime_nsecs: u32,
    pub dev: u32,
    pub ino: u32,
    pub uid: u32,
    pub gid: u32,
    pub size: u32,
}

impl StatData {
    #[cfg(unix)]
    pub fn from_metadata(meta: &std::fs::Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;
        Self {
            ctime_secs: meta.ctime() as u32,
            ctime_nsecs: meta.ctime_nsec() as u32,
            mtime_secs: meta.mtime() as u32,
            mtime_nsecs: meta.mtime_nsec() as u32,
            dev: meta.dev() as u32,
            ino: meta.ino() as u32,
            uid: meta.uid(),
            gid: meta.gid(),
            size: meta.len() as u32,
        }
    }

    #[cfg(not(unix))]
    pub fn from_metadata(meta: &std::fs::Metadata) -> Self {
        use std::time::UNIX_EPOCH;
        let mtime = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .unwrap_or_default();
        Self {
            ctime_secs: mtime.as_secs() as u32,
            ctime_nsecs: mtime.subsec_nanos(),
            mtime_secs: mtime.as_secs() as u32,
            mtime_nsecs: mtime.subsec_nanos(),
            dev: 0,
            ino: 0,
            uid: 0,
            gid: 0,
            size: meta.len() as u32,
        }
    }

    /// Fast-path change check: true if any field captured at stage time
    /// differs from the file's current metadata.
    pub fn matches(&self, meta: &std::fs::Metadata) -> bool {
        let other = Self::from_metadata(meta);
        self.size == other.size
            && self.mtime_secs == other.mtime_secs
            && self.mtime_nsecs == other.mtime_nsecs
            && self.ctime_secs == other.ctime_secs
            && self.ctime_nsecs == other.ctime_nsecs
            && (self.ino == 0 || other.ino == 0 || self.ino == other.ino)
            && (self.dev == 0 || other.dev == 0 || self.dev == other.dev)
    }
}

/// Convert a `FileMode` to the index's on-disk integer representation: the
/// octal mode string interpreted as a number (e.g. `100644` octal = 33188).
pub fn mode_to_u32(mode: FileMode) -> u32 {
    match mode {
        FileMode::Regular => 0o100644,
        FileMode::Executable => 0o100755,
        FileMode::Directory => 0o40000,
    }
}

pub fn u32_to_mode(raw: u32) -> Result<FileMode, IndexError> {
    match raw {
        0o100644 => Ok(FileMode::Regular),
        0o100755 => Ok(FileMode::Executable),
        0o40000 => Ok(FileMode::Directory),
        other => Err(IndexError::InvalidEntry {
            offset: 0,
            reason: format!("unsupported mode {:o}", other),
        }),
    }
}
