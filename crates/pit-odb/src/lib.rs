//! Object database: existence checks, loads, stores, and abbreviated-id
//! prefix resolution over the loose object store.

use std::path::Path;

use pit_hash::ObjectId;
use pit_loose::{LooseError, LooseObjectStore};
use pit_object::Object;

/// Errors produced by object database operations.
#[derive(Debug, thiserror::Error)]
pub enum OdbError {
    #[error("object {0} not found")]
    Missing(String),

    #[error("corrupt object {0}: {1}")]
    CorruptObject(String, String),

    #[error("revision '{0}' matches multiple objects")]
    AmbiguousRevision(String),

    #[error("revision '{0}' did not match any object")]
    UnknownRevision(String),

    #[error(transparent)]
    Loose(#[from] LooseError),
}

/// Content-addressed object database backed by loose storage at
/// `<repo>/.git/objects`.
pub struct ObjectDatabase {
    loose: LooseObjectStore,
}

impl ObjectDatabase {
    pub fn open(objects_dir: impl AsRef<Path>) -> Self {
        Self {
            loose: LooseObjectStore::open(objects_dir),
        }
    }

    /// Create the objects directory if absent.
    pub fn init(objects_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        std::fs::create_dir_all(objects_dir.as_ref())?;
        Ok(Self::open(objects_dir))
    }

    pub fn exists(&self, oid: &ObjectId) -> bool {
        self.loose.contains(oid)
    }

    /// Store an object; a no-op if it already exists.
    pub fn store(&self, object: &Object) -> Result<ObjectId, OdbError> {
        Ok(self.loose.write(object)?)
    }

    /// Load an object by its full oid.
    pub fn load(&self, oid: &ObjectId) -> Result<Object, OdbError> {
        self.loose
            .read(oid)?
            .ok_or_else(|| OdbError::Missing(oid.to_hex()))
    }

    /// Resolve a hex prefix to the single object it identifies.
    pub fn prefix_match(&self, prefix: &str) -> Result<ObjectId, OdbError> {
        let candidates = self.loose.prefix_match(prefix)?;
        match candidates.len() {
            0 => Err(OdbError::UnknownRevision(prefix.to_string())),
            1 => Ok(candidates[0]),
            _ => Err(OdbError::AmbiguousRevision(prefix.to_string())),
        }
    }
}
