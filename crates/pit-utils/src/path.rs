use bstr::{BStr, BString, ByteSlice, ByteVec};

use crate::error::UtilError;
use crate::Result;

/// A repo-relative path, always stored with forward slashes and no trailing slash.
///
/// Every path that crosses an object, index, or tree boundary in this crate is
/// normalized through this type so that comparisons and serialization are
/// platform-independent, matching git's own path representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepoPath(BString);

#[inline]
fn is_dir_sep(c: u8) -> bool {
    c == b'/' || c == b'\\'
}

impl RepoPath {
    /// Normalize separators to `/` and drop any trailing slash.
    pub fn new(path: impl AsRef<[u8]>) -> Self {
        let path = path.as_ref();
        let mut normalized = BString::new(Vec::with_capacity(path.len()));
        for &b in path {
            normalized.push_byte(if is_dir_sep(b) { b'/' } else { b });
        }
        while normalized.len() > 1 && normalized.last() == Some(&b'/') {
            normalized.pop();
        }
        RepoPath(normalized)
    }

    pub fn from_normalized(path: BString) -> Self {
        RepoPath(path)
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn as_bstr(&self) -> &BStr {
        self.0.as_bstr()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Join a path component onto this one.
    pub fn join(&self, other: impl AsRef<[u8]>) -> RepoPath {
        let other = other.as_ref();
        if other.is_empty() {
            return self.clone();
        }
        if self.0.is_empty() {
            return RepoPath::new(other);
        }
        let mut result = self.0.clone();
        result.push_byte(b'/');
        for &b in other {
            result.push_byte(if is_dir_sep(b) { b'/' } else { b });
        }
        RepoPath(result)
    }

    /// Split into path components on `/`.
    pub fn components(&self) -> Vec<&BStr> {
        if self.0.is_empty() {
            return Vec::new();
        }
        self.0.split_str(b"/").map(ByteSlice::as_bstr).collect()
    }

    /// Reject paths that escape the working tree (`..` segments, absolute paths).
    pub fn validate(&self) -> Result<()> {
        if self.0.is_empty() {
            return Err(UtilError::Path("empty path".into()));
        }
        if self.0.starts_with(b"/") {
            return Err(UtilError::Path(format!("'{}': absolute path", self)));
        }
        for component in self.0.split_str(b"/") {
            if component.is_empty() || component == b"." || component == b".." {
                return Err(UtilError::Path(format!(
                    "'{}': contains an invalid path component",
                    self
                )));
            }
        }
        Ok(())
    }

    pub fn to_os_path(&self, root: &std::path::Path) -> std::path::PathBuf {
        let mut buf = root.to_path_buf();
        for component in self.components() {
            buf.push(component.to_str_lossy().as_ref());
        }
        buf
    }
}

impl std::fmt::Display for RepoPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.as_bstr())
    }
}

impl AsRef<[u8]> for RepoPath {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl From<&str> for RepoPath {
    fn from(s: &str) -> Self {
        RepoPath::new(s.as_bytes())
    }
}

impl From<BString> for RepoPath {
    fn from(s: BString) -> Self {
        RepoPath::new(s)
    }
}
