use std::path::Path;

use crate::discover::DiscoveredRepo;
use crate::RepoError;

const DEFAULT_BRANCH: &str = "main";

const CONFIG_CONTENTS: &str =
    "[core]\n\trepositoryformatversion = 0\n\tfilemode = true\n\tbare = false\n";

/// Create the standard `.git` layout: HEAD, objects/, refs/heads/, and a
/// minimal static `config` file for interoperability with a real git client.
/// Re-running on an already-initialized repository is a safe no-op.
pub fn init_repository(work_tree: &Path) -> Result<DiscoveredRepo, RepoError> {
    let work_tree = if work_tree.is_relative() {
        std::env::current_dir()?.join(work_tree)
    } else {
        work_tree.to_path_buf()
    };
    let git_dir = work_tree.join(".git");

    if git_dir.join("HEAD").is_file() {
        return Ok(DiscoveredRepo { git_dir, work_tree });
    }

    std::fs::create_dir_all(&git_dir)?;
    pit_odb::ObjectDatabase::init(git_dir.join("objects"))?;
    pit_ref::RefStore::open(&git_dir).init(DEFAULT_BRANCH)?;

    let config_path = git_dir.join("config");
    if !config_path.exists() {
        std::fs::write(config_path, CONFIG_CONTENTS)?;
    }

    Ok(DiscoveredRepo { git_dir, work_tree })
}
