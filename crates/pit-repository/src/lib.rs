//! Repository discovery, initialization, and central access for all git subsystems.

mod add;
mod commit;
mod discover;
mod error;
mod init;
pub mod status;
pub mod tree_builder;

pub use add::{add_all, add_paths, add_update};
pub use commit::{create_commit, CommitOptions};
pub use discover::{discover_git_dir, DiscoveredRepo};
pub use error::RepoError;
pub use init::init_repository;
pub use status::{IgnoreRules, StatusGroup};

use std::path::{Path, PathBuf};

use pit_hash::ObjectId;
use pit_index::Index;
use pit_odb::ObjectDatabase;
use pit_ref::RefStore;

/// The central struct tying together a repository's subsystems: the object
/// database, the reference store, and the lazily-loaded staging index.
pub struct Repository {
    git_dir: PathBuf,
    work_tree: PathBuf,
    odb: ObjectDatabase,
    refs: RefStore,
    index: Option<Index>,
    index_path: PathBuf,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("git_dir", &self.git_dir)
            .field("work_tree", &self.work_tree)
            .finish_non_exhaustive()
    }
}

impl Repository {
    /// Open an existing repository, discovered by walking up from `start`.
    pub fn discover(start: impl AsRef<Path>) -> Result<Self, RepoError> {
        let discovered = discover::discover_git_dir(start.as_ref())?;
        Self::from_discovered(discovered)
    }

    /// Initialize a new repository at `work_tree`. Re-running on an
    /// already-initialized repository is a safe no-op.
    pub fn init(work_tree: impl AsRef<Path>) -> Result<Self, RepoError> {
        let discovered = crate::init_repository(work_tree.as_ref())?;
        Self::from_discovered(discovered)
    }

    fn from_discovered(discovered: DiscoveredRepo) -> Result<Self, RepoError> {
        let DiscoveredRepo { git_dir, work_tree } = discovered;
        let odb = ObjectDatabase::init(git_dir.join("objects"))?;
        let refs = RefStore::open(&git_dir);
        let index_path = git_dir.join("index");

        Ok(Self {
            git_dir,
            work_tree,
            odb,
            refs,
            index: None,
            index_path,
        })
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    pub fn work_tree(&self) -> &Path {
        &self.work_tree
    }

    pub fn odb(&self) -> &ObjectDatabase {
        &self.odb
    }

    pub fn refs(&self) -> &RefStore {
        &self.refs
    }

    /// Access the index, loading it from disk on first use.
    pub fn index(&mut self) -> Result<&Index, RepoError> {
        if self.index.is_none() {
            self.load_index()?;
        }
        Ok(self.index.as_ref().unwrap())
    }

    /// Access the index mutably, loading it from disk on first use.
    pub fn index_mut(&mut self) -> Result<&mut Index, RepoError> {
        if self.index.is_none() {
            self.load_index()?;
        }
        Ok(self.index.as_mut().unwrap())
    }

    /// Write the in-memory index back to `.git/index`.
    pub fn write_index(&self) -> Result<(), RepoError> {
        if let Some(ref idx) = self.index {
            idx.write_to(&self.index_path)?;
        }
        Ok(())
    }

    /// Discard the cached index and reload it from disk.
    pub fn reload_index(&mut self) -> Result<&Index, RepoError> {
        self.index = None;
        self.load_index()?;
        Ok(self.index.as_ref().unwrap())
    }

    fn load_index(&mut self) -> Result<(), RepoError> {
        self.index = Some(Index::load(&self.index_path)?);
        Ok(())
    }

    /// Resolve HEAD to a commit oid; `None` on an unborn branch.
    pub fn head_oid(&self) -> Result<Option<ObjectId>, RepoError> {
        Ok(self.refs.read_head()?)
    }

    /// The branch name HEAD points to, or `None` if detached.
    pub fn current_branch(&self) -> Result<Option<String>, RepoError> {
        Ok(self.refs.current_branch()?)
    }

    pub fn is_detached(&self) -> Result<bool, RepoError> {
        Ok(self.refs.is_detached()?)
    }

    /// The tree oid of HEAD's commit, if any.
    pub fn head_tree_oid(&self) -> Result<Option<ObjectId>, RepoError> {
        match self.head_oid()? {
            Some(oid) => match self.odb.load(&oid)? {
                pit_object::Object::Commit(c) => Ok(Some(c.tree)),
                _ => Err(RepoError::CorruptHead),
            },
            None => Ok(None),
        }
    }
}
