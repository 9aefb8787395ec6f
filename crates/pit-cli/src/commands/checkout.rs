use anyhow::{bail, Result};
use clap::Args;
use pit_ref::HeadTarget;

use super::open_repo;
use crate::Cli;

#[derive(Args)]
pub struct CheckoutArgs {
    /// Branch name or commit to check out
    target: String,
}

pub fn run(args: &CheckoutArgs, cli: &Cli) -> Result<i32> {
    let mut repo = open_repo(cli)?;

    let target_oid = pit_revision::resolve(repo.refs(), repo.odb(), &args.target)?;
    let target_tree = match repo.odb().load(&target_oid)? {
        pit_object::Object::Commit(c) => c.tree,
        _ => bail!("'{}' does not resolve to a commit", args.target),
    };

    let head_tree = repo.head_tree_oid()?;
    let diff = pit_diff::diff_trees(repo.odb(), head_tree.as_ref(), Some(&target_tree))?;

    let work_tree = repo.work_tree().to_path_buf();
    // A second handle on the same objects directory: `migrate` needs `&ObjectDatabase`
    // and `&mut Index` at once, which `repo.odb()`/`repo.index_mut()` can't both supply.
    let odb = pit_odb::ObjectDatabase::open(repo.git_dir().join("objects"));
    let index = repo.index_mut()?;
    pit_migration::migrate(&work_tree, &odb, index, &diff)?;
    repo.write_index()?;

    match repo.refs().branch_oid(&args.target)? {
        Some(_) => repo.refs().update_head(HeadTarget::Branch(args.target.clone()))?,
        None => repo.refs().update_head(HeadTarget::Oid(target_oid))?,
    }

    Ok(0)
}
