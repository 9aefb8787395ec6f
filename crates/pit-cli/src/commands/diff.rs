use anyhow::Result;
use bstr::ByteSlice;
use clap::Args;
use pit_diff::Change;
use pit_hash::ObjectId;

use super::open_repo;
use crate::Cli;

#[derive(Args)]
pub struct DiffArgs {
    /// Compare the index against HEAD (the only comparison available without
    /// a working-tree tree representation; a bare `diff` does the same)
    #[arg(long)]
    cached: bool,

    /// Revisions to compare: none (HEAD vs index), one (revision vs index),
    /// or two (revision vs revision)
    #[arg(value_name = "revision")]
    revisions: Vec<String>,
}

pub fn run(args: &DiffArgs, cli: &Cli) -> Result<i32> {
    let mut repo = open_repo(cli)?;

    let (old_tree, new_tree) = match args.revisions.as_slice() {
        [a, b] => (resolve_tree(&repo, a)?, resolve_tree(&repo, b)?),
        [a] => (resolve_tree(&repo, a)?, index_tree(&mut repo)?),
        _ => {
            let _ = args.cached;
            (repo.head_tree_oid()?, index_tree(&mut repo)?)
        }
    };

    let diff = pit_diff::diff_trees(repo.odb(), old_tree.as_ref(), new_tree.as_ref())?;

    for (path, change) in &diff {
        match change {
            Change::Added(_) => println!("A\t{}", path.to_str_lossy()),
            Change::Deleted(_) => println!("D\t{}", path.to_str_lossy()),
            Change::Updated(_, _) => println!("M\t{}", path.to_str_lossy()),
        }
    }

    Ok(0)
}

fn resolve_tree(repo: &pit_repository::Repository, expr: &str) -> Result<Option<ObjectId>> {
    let oid = pit_revision::resolve(repo.refs(), repo.odb(), expr)?;
    match repo.odb().load(&oid)? {
        pit_object::Object::Commit(c) => Ok(Some(c.tree)),
        _ => Ok(Some(oid)),
    }
}

fn index_tree(repo: &mut pit_repository::Repository) -> Result<Option<ObjectId>> {
    let index = repo.index()?.clone();
    let oid = pit_repository::tree_builder::build_tree_from_index(&index, repo.odb())?;
    Ok(Some(oid))
}
