use std::path::{Path, PathBuf};

use bstr::{BString, ByteSlice};
use pit_index::StatData;
use pit_object::{Blob, FileMode, Object};

use crate::status::IgnoreRules;
use crate::{Repository, RepoError};

/// Stage every path under `fs_path` (a file or directory) into the index.
/// Ignored paths are skipped silently unless `force` is set.
pub fn add_paths(
    repo: &mut Repository,
    work_tree: &Path,
    paths: &[PathBuf],
    ignore: &IgnoreRules,
    force: bool,
) -> Result<(), RepoError> {
    for path in paths {
        stage_path(repo, work_tree, path, ignore, force)?;
    }
    Ok(())
}

fn stage_path(
    repo: &mut Repository,
    work_tree: &Path,
    fs_path: &Path,
    ignore: &IgnoreRules,
    force: bool,
) -> Result<(), RepoError> {
    if fs_path.is_dir() {
        stage_directory(repo, work_tree, fs_path, ignore, force)
    } else {
        if !force && name_is_ignored(ignore, fs_path) {
            return Ok(());
        }
        stage_single_file(repo, work_tree, fs_path)
    }
}

fn stage_directory(
    repo: &mut Repository,
    work_tree: &Path,
    dir: &Path,
    ignore: &IgnoreRules,
    force: bool,
) -> Result<(), RepoError> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)?.collect::<std::io::Result<_>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        if path.file_name().map(|n| n == ".git").unwrap_or(false) {
            continue;
        }

        if !force && name_is_ignored(ignore, &path) {
            continue;
        }

        if path.is_dir() {
            stage_directory(repo, work_tree, &path, ignore, force)?;
        } else {
            stage_single_file(repo, work_tree, &path)?;
        }
    }
    Ok(())
}

fn stage_single_file(repo: &mut Repository, work_tree: &Path, fs_path: &Path) -> Result<(), RepoError> {
    let rel_path = relative_path(work_tree, fs_path);
    let metadata = std::fs::symlink_metadata(fs_path)?;
    let mode = file_mode_from_metadata(&metadata);

    let needs_update = {
        let index = repo.index()?;
        match index.find(rel_path.as_bytes()) {
            Some(entry) => entry.mode != mode || !entry.stat.matches(&metadata),
            None => true,
        }
    };
    if !needs_update {
        return Ok(());
    }

    let content = std::fs::read(fs_path)?;
    let oid = repo.odb().store(&Object::Blob(Blob::new(content)))?;
    let stat = StatData::from_metadata(&metadata);

    repo.index_mut()?.add_entry(rel_path, oid, mode, stat);
    Ok(())
}

/// Remove index entries whose working-tree file is gone, then stage every
/// path below the work tree root.
pub fn add_all(repo: &mut Repository, work_tree: &Path, ignore: &IgnoreRules, force: bool) -> Result<(), RepoError> {
    remove_deleted(repo, work_tree)?;
    stage_directory(repo, work_tree, work_tree, ignore, force)
}

/// Re-stage already-tracked files only: refresh modified ones, drop deleted
/// ones, never pick up new untracked files.
pub fn add_update(repo: &mut Repository, work_tree: &Path) -> Result<(), RepoError> {
    let tracked: Vec<BString> = repo.index()?.iter().map(|e| e.path.clone()).collect();

    for path in &tracked {
        let fs_path = work_tree.join(path.to_str_lossy().as_ref());
        if fs_path.exists() {
            stage_single_file(repo, work_tree, &fs_path)?;
        } else {
            repo.index_mut()?.remove_entry(path.as_bytes());
        }
    }
    Ok(())
}

fn remove_deleted(repo: &mut Repository, work_tree: &Path) -> Result<(), RepoError> {
    let deleted: Vec<BString> = repo
        .index()?
        .iter()
        .filter(|e| !work_tree.join(e.path.to_str_lossy().as_ref()).exists())
        .map(|e| e.path.clone())
        .collect();

    for path in &deleted {
        repo.index_mut()?.remove_entry(path.as_bytes());
    }
    Ok(())
}

fn name_is_ignored(ignore: &IgnoreRules, fs_path: &Path) -> bool {
    match fs_path.file_name().and_then(|n| n.to_str()) {
        Some(name) => ignore.is_ignored_segment(name),
        None => false,
    }
}

fn file_mode_from_metadata(meta: &std::fs::Metadata) -> FileMode {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if meta.permissions().mode() & 0o111 != 0 {
            return FileMode::Executable;
        }
    }
    FileMode::Regular
}

fn relative_path(base: &Path, path: &Path) -> BString {
    let rel = path.strip_prefix(base).unwrap_or(path);
    BString::from(rel.to_string_lossy().as_bytes())
}
