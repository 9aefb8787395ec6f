/// Errors arising from object-id parsing.
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    #[error("invalid object id '{0}': expected 40 lowercase hex characters")]
    InvalidHex(String),

    #[error("invalid object id length: expected 40 hex characters, got {0}")]
    InvalidLength(usize),
}
