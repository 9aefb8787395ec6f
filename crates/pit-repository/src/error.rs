use std::path::PathBuf;

/// Errors from repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("not a git repository (or any of the parent directories): {0}")]
    NotFound(PathBuf),

    #[error("repository already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("nothing to commit, working tree clean")]
    NothingToCommit,

    #[error("HEAD does not point at a commit object")]
    CorruptHead,

    #[error(transparent)]
    Odb(#[from] pit_odb::OdbError),

    #[error(transparent)]
    Ref(#[from] pit_ref::RefError),

    #[error(transparent)]
    Index(#[from] pit_index::IndexError),

    #[error(transparent)]
    Object(#[from] pit_object::ObjectError),

    #[error(transparent)]
    Util(#[from] pit_utils::UtilError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
