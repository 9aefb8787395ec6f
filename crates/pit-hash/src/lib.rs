//! SHA-1 object identifiers shared by every layer of the object store.

mod error;
mod hasher;
mod hex;
mod oid;

pub use error::HashError;
pub use hasher::{hash, Hasher};
pub use oid::{ObjectId, HEX_LEN, RAW_LEN};
