/// Errors arising from the foundation utilities (paths, signatures, atomic writes).
#[derive(Debug, thiserror::Error)]
pub enum UtilError {
    #[error("invalid path: {0}")]
    Path(String),

    #[error("invalid signature: {0}")]
    Signature(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
