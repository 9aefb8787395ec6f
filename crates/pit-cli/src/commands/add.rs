use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use super::open_repo;
use crate::Cli;

#[derive(Args)]
pub struct AddArgs {
    /// Add all tracked and untracked files
    #[arg(short = 'A', long = "all")]
    all: bool,

    /// Update tracked files only (no new files)
    #[arg(short, long)]
    update: bool,

    /// Allow adding otherwise ignored files
    #[arg(short, long)]
    force: bool,

    /// Files to add
    #[arg(value_name = "pathspec")]
    files: Vec<PathBuf>,
}

pub fn run(args: &AddArgs, cli: &Cli) -> Result<i32> {
    let mut repo = open_repo(cli)?;
    let work_tree = repo.work_tree().to_path_buf();
    let ignore = pit_repository::IgnoreRules::load(&work_tree)?;

    if args.all || (args.files.len() == 1 && args.files[0] == PathBuf::from(".")) {
        pit_repository::add_all(&mut repo, &work_tree, &ignore, args.force)?;
    } else if args.update {
        pit_repository::add_update(&mut repo, &work_tree)?;
    } else if args.files.is_empty() {
        bail!("Nothing specified, nothing added.\nMaybe you wanted to say 'pit add .'?");
    } else {
        pit_repository::add_paths(&mut repo, &work_tree, &args.files, &ignore, args.force)?;
    }

    repo.write_index()?;

    Ok(0)
}
