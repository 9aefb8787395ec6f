use std::path::{Path, PathBuf};

use crate::RepoError;

/// A discovered repository's paths, before the subsystems are opened.
#[derive(Debug)]
pub struct DiscoveredRepo {
    pub git_dir: PathBuf,
    pub work_tree: PathBuf,
}

/// Discover a repository by walking up from `start`, looking for a `.git`
/// directory. Honors `GIT_DIR` if set, overriding discovery entirely.
pub fn discover_git_dir(start: &Path) -> Result<DiscoveredRepo, RepoError> {
    if let Some(git_dir) = std::env::var_os("GIT_DIR").map(PathBuf::from) {
        let git_dir = if git_dir.is_absolute() { git_dir } else { start.join(git_dir) };
        let work_tree = git_dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| start.to_path_buf());
        return Ok(DiscoveredRepo { git_dir, work_tree });
    }

    let start = std::fs::canonicalize(start).map_err(|_| RepoError::NotFound(start.to_path_buf()))?;
    let mut current = start.clone();
    loop {
        let dot_git = current.join(".git");
        if dot_git.is_dir() {
            return Ok(DiscoveredRepo {
                git_dir: dot_git,
                work_tree: current,
            });
        }
        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => return Err(RepoError::NotFound(start)),
        }
    }
}
