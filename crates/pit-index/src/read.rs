use bstr::BString;
use pit_hash::{ObjectId, RAW_LEN};

use crate::entry::{u32_to_mode, IndexEntry, StatData};
use crate::{Index, IndexError};

const INDEX_SIGNATURE: &[u8; 4] = b"DIRC";
const SUPPORTED_VERSION: u32 = 2;
const STAT_PREFIX_LEN: usize = 40;
const SHA1_LEN: usize = 20;

/// Parse an index file from raw bytes.
pub fn parse_index(data: &[u8]) -> Result<Index, IndexError> {
    if data.len() < 12 + 20 {
        return Err(IndexError::InvalidHeader("index file too short".into()));
    }

    verify_checksum(data)?;

    let mut cursor = 0;

    let sig = &data[cursor..cursor + 4];
    if sig != INDEX_SIGNATURE {
        return Err(IndexError::InvalidHeader(format!(
            "bad signature: expected DIRC, got {:?}",
            sig
        )));
    }
    cursor += 4;

    let version = read_u32(&data[cursor..]);
    cursor += 4;
    if version != SUPPORTED_VERSION {
        return Err(IndexError::UnsupportedVersion(version));
    }

    let entry_count = read_u32(&data[cursor..]) as usize;
    cursor += 4;

    let content_end = data.len() - 20;
    let mut entries = Vec::with_capacity(entry_count);

    for _ in 0..entry_count {
        let (entry, next_cursor) = parse_entry(data, cursor, content_end)?;
        entries.push(entry);
        cursor = next_cursor;
    }

    Ok(Index { entries })
}

fn parse_entry(data: &[u8], start: usize, content_end: usize) -> Result<(IndexEntry, usize), IndexError> {
    let mut cursor = start;

    if cursor + STAT_PREFIX_LEN + SHA1_LEN + 2 > content_end {
        return Err(IndexError::InvalidEntry {
            offset: start,
            reason: "entry too short".into(),
        });
    }

    let stat = StatData {
        ctime_secs: read_u32(&data[cursor..]),
        ctime_nsecs: read_u32(&data[cursor + 4..]),
        mtime_secs: read_u32(&data[cursor + 8..]),
        mtime_nsecs: read_u32(&data[cursor + 12..]),
        dev: read_u32(&data[cursor + 16..]),
        ino: read_u32(&data[cursor + 20..]),
        uid: read_u32(&data[cursor + 28..]),
        gid: read_u32(&data[cursor + 32..]),
        size: read_u32(&data[cursor + 36..]),
    };
    let mode_raw = read_u32(&data[cursor + 24..]);
    let mode = u32_to_mode(mode_raw)?;
    cursor += STAT_PREFIX_LEN;

    let mut raw = [0u8; RAW_LEN];
    raw.copy_from_slice(&data[cursor..cursor + SHA1_LEN]);
    let oid = ObjectId::from_raw(raw);
    cursor += SHA1_LEN;

    let flags = read_u16(&data[cursor..]);
    let name_len = (flags & 0x0FFF) as usize;
    cursor += 2;

    if cursor + name_len > content_end {
        return Err(IndexError::InvalidEntry {
            offset: start,
            reason: "truncated path".into(),
        });
    }
    let path = BString::from(&data[cursor..cursor + name_len]);

    // Path bytes are followed by mandatory NUL padding to an 8-byte boundary,
    // measured from the start of the entry.
    let consumed = (cursor + name_len) - start;
    let padded = (consumed + 8) & !7;
    cursor = start + padded;
    if cursor > content_end {
        return Err(IndexError::InvalidEntry {
            offset: start,
            reason: "entry padding exceeds index bounds".into(),
        });
    }

    Ok((IndexEntry { path, oid, mode, stat }, cursor))
}

fn verify_checksum(data: &[u8]) -> Result<(), IndexError> {
    let content = &data[..data.len() - 20];
    let stored = &data[data.len() - 20..];
    let computed = pit_hash::hash(content);
    if computed.as_bytes() != stored {
        return Err(IndexError::ChecksumMismatch);
    }
    Ok(())
}

fn read_u32(data: &[u8]) -> u32 {
    u32::from_be_bytes([data[0], data[1], data[2], data[3]])
}

fn read_u16(data: &[u8]) -> u16 {
    u16::from_be_bytes([data[0], data[1]])
}
