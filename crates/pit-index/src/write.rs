use crate::entry::mode_to_u32;
use crate::Index;

const INDEX_SIGNATURE: &[u8; 4] = b"DIRC";
const VERSION: u32 = 2;

impl Index {
    /// Serialize to the on-disk binary format: header, entries sorted by
    /// path, and a trailing SHA-1 checksum over everything before it.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(INDEX_SIGNATURE);
        out.extend_from_slice(&VERSION.to_be_bytes());
        out.extend_from_slice(&(self.entries.len() as u32).to_be_bytes());

        for entry in &self.entries {
            let start = out.len();

            out.extend_from_slice(&entry.stat.ctime_secs.to_be_bytes());
            out.extend_from_slice(&entry.stat.ctime_nsecs.to_be_bytes());
            out.extend_from_slice(&entry.stat.mtime_secs.to_be_bytes());
            out.extend_from_slice(&entry.stat.mtime_nsecs.to_be_bytes());
            out.extend_from_slice(&entry.stat.dev.to_be_bytes());
            out.extend_from_slice(&entry.stat.ino.to_be_bytes());
            out.extend_from_slice(&mode_to_u32(entry.mode).to_be_bytes());
            out.extend_from_slice(&entry.stat.uid.to_be_bytes());
            out.extend_from_slice(&entry.stat.gid.to_be_bytes());
            out.extend_from_slice(&entry.stat.size.to_be_bytes());

            out.extend_from_slice(entry.oid.as_bytes());

            let name_len = entry.path.len().min(0x0FFF) as u16;
            out.extend_from_slice(&name_len.to_be_bytes());

            out.extend_from_slice(&entry.path);

            let consumed = out.len() - start;
            let padded = (consumed + 8) & !7;
            out.resize(start + padded, 0);
        }

        let checksum = pit_hash::hash(&out);
        out.extend_from_slice(checksum.as_bytes());
        out
    }
}
