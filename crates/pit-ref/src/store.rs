use std::path::{Path, PathBuf};

use pit_hash::ObjectId;
use pit_utils::write_atomic;

use crate::branch_name::validate_branch_name;
use crate::error::RefError;

const HEAD_REF_PREFIX: &str = "ref: ";

/// Where `update_head` should point HEAD: a detached oid, or an attached
/// branch name under `refs/heads`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadTarget {
    Oid(ObjectId),
    Branch(String),
}

/// The reference store rooted at a repository's `.git` directory: `HEAD`
/// and the branch files under `refs/heads`.
pub struct RefStore {
    git_dir: PathBuf,
}

impl RefStore {
    pub fn open(git_dir: impl Into<PathBuf>) -> Self {
        Self { git_dir: git_dir.into() }
    }

    fn heads_dir(&self) -> PathBuf {
        self.git_dir.join("refs").join("heads")
    }

    fn branch_path(&self, name: &str) -> PathBuf {
        self.heads_dir().join(name)
    }

    fn head_path(&self) -> PathBuf {
        self.git_dir.join("HEAD")
    }

    /// Create `refs/heads` and write `HEAD` pointing at `refs/heads/main`.
    pub fn init(&self, default_branch: &str) -> Result<(), RefError> {
        std::fs::create_dir_all(self.heads_dir())?;
        write_atomic(self.head_path(), format!("{HEAD_REF_PREFIX}refs/heads/{default_branch}\n").as_bytes())?;
        Ok(())
    }

    /// Read HEAD, following a symbolic chain to a concrete oid. Returns
    /// `None` if HEAD is attached to a branch whose file is missing or empty.
    pub fn read_head(&self) -> Result<Option<ObjectId>, RefError> {
        let contents = match std::fs::read_to_string(self.head_path()) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(RefError::Io(e)),
        };
        let trimmed = contents.trim_end_matches('\n');

        if let Some(branch_ref) = trimmed.strip_prefix(HEAD_REF_PREFIX) {
            let branch = branch_ref.strip_prefix("refs/heads/").unwrap_or(branch_ref);
            self.read_branch(branch)
        } else if trimmed.is_empty() {
            Ok(None)
        } else {
            Ok(Some(ObjectId::from_hex(trimmed)?))
        }
    }

    fn read_branch(&self, name: &str) -> Result<Option<ObjectId>, RefError> {
        match std::fs::read_to_string(self.branch_path(name)) {
            Ok(c) => {
                let trimmed = c.trim_end_matches('\n');
                if trimmed.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(ObjectId::from_hex(trimmed)?))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RefError::Io(e)),
        }
    }

    /// Write `oid` to the branch HEAD currently points to, without altering
    /// HEAD itself. No-op (creates the file) if HEAD is detached's branch
    /// is missing; errors if HEAD is itself detached.
    pub fn update_head_via_ref(&self, oid: ObjectId) -> Result<(), RefError> {
        let contents = std::fs::read_to_string(self.head_path())?;
        let trimmed = contents.trim_end_matches('\n');
        let branch_ref = trimmed
            .strip_prefix(HEAD_REF_PREFIX)
            .ok_or_else(|| RefError::InvalidBranchName("HEAD is detached".into()))?;
        let branch = branch_ref.strip_prefix("refs/heads/").unwrap_or(branch_ref);
        let path = self.branch_path(branch);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        write_atomic(path, format!("{}\n", oid.to_hex()).as_bytes())?;
        Ok(())
    }

    /// Point HEAD directly at `target`: an oid detaches, a branch attaches.
    pub fn update_head(&self, target: HeadTarget) -> Result<(), RefError> {
        let contents = match target {
            HeadTarget::Oid(oid) => format!("{}\n", oid.to_hex()),
            HeadTarget::Branch(name) => {
                validate_branch_name(&name)?;
                format!("{HEAD_REF_PREFIX}refs/heads/{name}\n")
            }
        };
        write_atomic(self.head_path(), contents.as_bytes())?;
        Ok(())
    }

    pub fn is_detached(&self) -> Result<bool, RefError> {
        Ok(self.current_branch()?.is_none())
    }

    /// The branch name HEAD points to when attached, else `None`.
    pub fn current_branch(&self) -> Result<Option<String>, RefError> {
        let contents = match std::fs::read_to_string(self.head_path()) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(RefError::Io(e)),
        };
        let trimmed = contents.trim_end_matches('\n');
        match trimmed.strip_prefix(HEAD_REF_PREFIX) {
            Some(branch_ref) => Ok(Some(
                branch_ref.strip_prefix("refs/heads/").unwrap_or(branch_ref).to_string(),
            )),
            None => Ok(None),
        }
    }

    /// Create a new branch pointing at `oid`. Fails if already present.
    pub fn create_branch(&self, name: &str, oid: ObjectId) -> Result<(), RefError> {
        validate_branch_name(name)?;
        let path = self.branch_path(name);
        if path.exists() {
            return Err(RefError::BranchAlreadyExists(name.to_string()));
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        write_atomic(path, format!("{}\n", oid.to_hex()).as_bytes())?;
        Ok(())
    }

    /// Remove a branch's ref file. A missing branch is a soft no-op.
    pub fn delete_branch(&self, name: &str) -> Result<(), RefError> {
        match std::fs::remove_file(self.branch_path(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RefError::Io(e)),
        }
    }

    /// List branch names, sorted.
    pub fn list_branches(&self) -> Result<Vec<String>, RefError> {
        let dir = self.heads_dir();
        let mut names = Vec::new();
        let entries = match std::fs::read_dir(&dir) {
            Ok(e) => e,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(names),
            Err(e) => return Err(RefError::Io(e)),
        };
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn branch_oid(&self, name: &str) -> Result<Option<ObjectId>, RefError> {
        self.read_branch(name)
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }
}
