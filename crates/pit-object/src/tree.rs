use std::cmp::Ordering;

use bstr::{BString, ByteSlice};
use pit_hash::{ObjectId, RAW_LEN};

use crate::ObjectError;

/// A tree entry's file mode.
///
/// Directories serialize as `40000` (five digits, no leading zero) per git's
/// canonical tree format; both `40000` and `040000` are accepted on parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileMode {
    Regular,
    Executable,
    Directory,
}

impl FileMode {
    pub fn parse(mode: &[u8]) -> Result<Self, ObjectError> {
        match mode {
            b"100644" => Ok(Self::Regular),
            b"100755" => Ok(Self::Executable),
            b"40000" | b"040000" => Ok(Self::Directory),
            other => Err(ObjectError::InvalidFileMode(
                String::from_utf8_lossy(other).into_owned(),
            )),
        }
    }

    /// Canonical serialized form: no leading zero on the directory mode.
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            Self::Regular => b"100644",
            Self::Executable => b"100755",
            Self::Directory => b"40000",
        }
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, Self::Directory)
    }
}

/// One entry within a tree object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub mode: FileMode,
    pub name: BString,
    pub oid: ObjectId,
}

impl TreeEntry {
    pub fn new(mode: FileMode, name: impl Into<BString>, oid: ObjectId) -> Self {
        Self {
            mode,
            name: name.into(),
            oid,
        }
    }

    /// git's `base_name_compare`: a directory entry sorts as if its name had a
    /// trailing `/`, so `"foo"` (file) sorts before `"foo.c"` but `"foo"` (dir)
    /// sorts after it — comparing `"foo/"` against `"foo.c"`.
    pub fn cmp_entries(a: &TreeEntry, b: &TreeEntry) -> Ordering {
        let a_name = a.name.as_bytes();
        let b_name = b.name.as_bytes();
        let common = a_name.len().min(b_name.len());

        match a_name[..common].cmp(&b_name[..common]) {
            Ordering::Equal => {}
            other => return other,
        }

        let a_rest: u16 = if a_name.len() > common {
            a_name[common] as u16
        } else if a.mode.is_tree() {
            b'/' as u16
        } else {
            0
        };
        let b_rest: u16 = if b_name.len() > common {
            b_name[common] as u16
        } else if b.mode.is_tree() {
            b'/' as u16
        } else {
            0
        };
        a_rest.cmp(&b_rest)
    }
}

/// A git tree object: a sorted list of entries (files, executables, subtrees).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tree {
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new(mut entries: Vec<TreeEntry>) -> Self {
        entries.sort_by(TreeEntry::cmp_entries);
        Self { entries }
    }

    pub fn find(&self, name: &[u8]) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name.as_bytes() == name)
    }

    /// Parse tree content: a concatenation of `<mode> <name>\0<oid-raw-20>` entries.
    pub fn parse(content: &[u8]) -> Result<Self, ObjectError> {
        let mut entries = Vec::new();
        let mut offset = 0usize;

        while offset < content.len() {
            let space_pos = content[offset..]
                .iter()
                .position(|&b| b == b' ')
                .ok_or_else(|| ObjectError::InvalidTreeEntry {
                    offset,
                    reason: "missing space after mode".into(),
                })?
                + offset;

            let mode = FileMode::parse(&content[offset..space_pos]).map_err(|_| {
                ObjectError::InvalidTreeEntry {
                    offset,
                    reason: "invalid mode".into(),
                }
            })?;

            let null_pos = content[space_pos + 1..]
                .iter()
                .position(|&b| b == 0)
                .ok_or_else(|| ObjectError::InvalidTreeEntry {
                    offset,
                    reason: "missing null after name".into(),
                })?
                + space_pos
                + 1;

            let name = BString::from(&content[space_pos + 1..null_pos]);

            let oid_start = null_pos + 1;
            let oid_end = oid_start + RAW_LEN;
            if oid_end > content.len() {
                return Err(ObjectError::InvalidTreeEntry {
                    offset,
                    reason: "truncated oid".into(),
                });
            }
            let mut raw = [0u8; RAW_LEN];
            raw.copy_from_slice(&content[oid_start..oid_end]);

            entries.push(TreeEntry::new(mode, name, ObjectId::from_raw(raw)));
            offset = oid_end;
        }

        Ok(Self { entries })
    }

    /// Serialize: entries in their stored order (callers must keep them sorted).
    pub fn serialize_content(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for entry in &self.entries {
            out.extend_from_slice(entry.mode.as_bytes());
            out.push(b' ');
            out.extend_from_slice(entry.name.as_bytes());
            out.push(0);
            out.extend_from_slice(entry.oid.as_bytes());
        }
        out
    }
}
