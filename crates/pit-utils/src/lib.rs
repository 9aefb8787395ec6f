pub mod atomic;
pub mod error;
pub mod path;
pub mod signature;

pub use atomic::write_atomic;
pub use error::UtilError;
pub use path::RepoPath;
pub use signature::Signature;

pub type Result<T> = std::result::Result<T, UtilError>;
