/// Errors produced by reference operations.
#[derive(Debug, thiserror::Error)]
pub enum RefError {
    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("branch already exists: {0}")]
    BranchAlreadyExists(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Hash(#[from] pit_hash::HashError),

    #[error(transparent)]
    Util(#[from] pit_utils::UtilError),
}
