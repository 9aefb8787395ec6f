use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::Result;

/// Write `contents` to `path` durably: write to a sibling temp file, flush,
/// sync, then rename into place. The rename is atomic on the same filesystem,
/// so readers never observe a partially-written file.
///
/// Locking is not performed; concurrent writers may race, with the last
/// rename winning.
pub fn write_atomic(path: impl AsRef<Path>, contents: &[u8]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = tmp_path_for(path);
    let mut tmp = File::create(&tmp_path)?;
    tmp.write_all(contents)?;
    tmp.flush()?;
    tmp.sync_all()?;
    drop(tmp);

    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn tmp_path_for(path: &Path) -> std::path::PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{}.tmp-{}", file_name, std::process::id()))
}
