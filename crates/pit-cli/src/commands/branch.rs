use anyhow::{anyhow, Result};
use clap::Args;

use super::open_repo;
use crate::Cli;

#[derive(Args)]
pub struct BranchArgs {
    /// Delete a branch
    #[arg(short = 'd', long)]
    delete: bool,

    /// Branch name to create or delete; omit to list branches
    name: Option<String>,

    /// Starting point for a new branch (defaults to HEAD)
    start_point: Option<String>,
}

pub fn run(args: &BranchArgs, cli: &Cli) -> Result<i32> {
    let repo = open_repo(cli)?;

    let Some(name) = &args.name else {
        let current = repo.current_branch()?;
        for branch in repo.refs().list_branches()? {
            let marker = if current.as_deref() == Some(branch.as_str()) { "* " } else { "  " };
            println!("{marker}{branch}");
        }
        return Ok(0);
    };

    if args.delete {
        repo.refs().delete_branch(name)?;
        println!("Deleted branch {}.", name);
        return Ok(0);
    }

    let start_oid = match &args.start_point {
        Some(rev) => pit_revision::resolve(repo.refs(), repo.odb(), rev)?,
        None => repo
            .head_oid()?
            .ok_or_else(|| anyhow!("not a valid object name: 'HEAD'"))?,
    };
    repo.refs().create_branch(name, start_oid)?;

    Ok(0)
}
