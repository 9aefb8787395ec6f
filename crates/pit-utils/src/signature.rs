use bstr::{BStr, BString, ByteSlice, ByteVec};

use crate::error::UtilError;
use crate::Result;

/// An author or committer identity, as embedded in a commit object.
///
/// The timezone is kept in git's raw decimal form (`+0530`, `-0500`) rather than
/// converted to minutes, since that is the only form ever written back out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: BString,
    pub email: BString,
    pub timestamp: i64,
    pub tz_offset: i32,
}

impl Signature {
    pub fn new(name: impl Into<BString>, email: impl Into<BString>, timestamp: i64, tz_offset: i32) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            timestamp,
            tz_offset,
        }
    }

    /// Construct a signature using the current time and the local timezone offset.
    pub fn now(name: impl Into<BString>, email: impl Into<BString>) -> Self {
        let now = chrono::Local::now();
        let offset_secs = now.offset().local_minus_utc();
        Self {
            name: name.into(),
            email: email.into(),
            timestamp: now.timestamp(),
            tz_offset: seconds_to_tz_offset(offset_secs),
        }
    }

    /// Parse from git's canonical format: `Name <email> timestamp tz`.
    pub fn parse(input: &BStr) -> Result<Self> {
        let bytes = input.as_bytes();

        let gt_pos = bytes
            .iter()
            .rposition(|&b| b == b'>')
            .ok_or_else(|| UtilError::Signature("missing '>'".into()))?;
        let lt_pos = bytes[..gt_pos]
            .iter()
            .rposition(|&b| b == b'<')
            .ok_or_else(|| UtilError::Signature("missing '<'".into()))?;

        let name = bytes[..lt_pos].trim();
        let email = &bytes[lt_pos + 1..gt_pos];
        let rest = bytes[gt_pos + 1..].trim();

        let rest_str = std::str::from_utf8(rest)
            .map_err(|_| UtilError::Signature("non-UTF-8 timestamp/tz".into()))?;
        let mut parts = rest_str.splitn(2, ' ');
        let ts_str = parts
            .next()
            .ok_or_else(|| UtilError::Signature("missing timestamp".into()))?;
        let tz_str = parts
            .next()
            .ok_or_else(|| UtilError::Signature("missing timezone".into()))?;

        let timestamp: i64 = ts_str
            .parse()
            .map_err(|_| UtilError::Signature(format!("invalid timestamp '{}'", ts_str)))?;
        let tz_offset: i32 = tz_str
            .parse()
            .map_err(|_| UtilError::Signature(format!("invalid timezone '{}'", tz_str)))?;

        Ok(Self {
            name: BString::from(name),
            email: BString::from(email),
            timestamp,
            tz_offset,
        })
    }

    /// Render in git's canonical format: `Name <email> timestamp tz`.
    pub fn to_bytes(&self) -> BString {
        let mut out = BString::new(Vec::new());
        out.push_str(&self.name);
        out.push_str(b" <");
        out.push_str(&self.email);
        out.push_str(b"> ");
        out.push_str(format!("{} {:+05}", self.timestamp, self.tz_offset).as_bytes());
        out
    }
}

fn seconds_to_tz_offset(offset_secs: i32) -> i32 {
    let sign = if offset_secs < 0 { -1 } else { 1 };
    let abs = offset_secs.unsigned_abs() as i32;
    let hours = abs / 3600;
    let minutes = (abs % 3600) / 60;
    sign * (hours * 100 + minutes)
}
