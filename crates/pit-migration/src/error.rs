use bstr::BString;

/// Errors produced by the checkout engine.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("your local changes would be overwritten by checkout: {0:?}")]
    CheckoutConflict(Vec<BString>),

    #[error(transparent)]
    Diff(#[from] pit_diff::DiffError),

    #[error(transparent)]
    Odb(#[from] pit_odb::OdbError),

    #[error(transparent)]
    Index(#[from] pit_index::IndexError),

    #[error(transparent)]
    Object(#[from] pit_object::ObjectError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
