/// Errors produced while parsing or resolving a revision expression.
#[derive(Debug, thiserror::Error)]
pub enum RevisionError {
    #[error("invalid revision syntax: '{0}'")]
    InvalidRevision(String),

    #[error("revision '{0}' did not resolve to a commit")]
    UnknownRevision(String),

    #[error("revision '{0}' is ambiguous")]
    AmbiguousRevision(String),

    #[error(transparent)]
    Odb(#[from] pit_odb::OdbError),

    #[error(transparent)]
    Ref(#[from] pit_ref::RefError),

    #[error(transparent)]
    Object(#[from] pit_object::ObjectError),
}
