use sha1::{Digest, Sha1};

use crate::oid::ObjectId;

/// Incremental SHA-1 hasher producing an [`ObjectId`] on finalize.
///
/// Thin wrapper so callers never reach for the `sha1` crate directly —
/// keeps the hash algorithm choice in one place.
#[derive(Default)]
pub struct Hasher(Sha1);

impl Hasher {
    pub fn new() -> Self {
        Self(Sha1::new())
    }

    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.0.update(data);
        self
    }

    pub fn finalize(self) -> ObjectId {
        let digest = self.0.finalize();
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest);
        ObjectId::from_raw(bytes)
    }
}

/// One-shot SHA-1 of a byte slice.
pub fn hash(data: &[u8]) -> ObjectId {
    let mut h = Hasher::new();
    h.update(data);
    h.finalize()
}
