use anyhow::Result;
use bstr::ByteSlice;
use clap::Args;

use super::open_repo;
use crate::Cli;

#[derive(Args)]
pub struct StatusArgs {}

pub fn run(_args: &StatusArgs, cli: &Cli) -> Result<i32> {
    let mut repo = open_repo(cli)?;
    let work_tree = repo.work_tree().to_path_buf();
    let head_tree_oid = repo.head_tree_oid()?;
    let index = repo.index()?.clone();

    let status = pit_repository::compute_status(&work_tree, &index, repo.odb(), head_tree_oid)?;

    match repo.current_branch()? {
        Some(branch) => println!("On branch {}", branch),
        None => println!("HEAD detached"),
    }
    if head_tree_oid.is_none() {
        println!("\nNo commits yet");
    }

    let mut anything = false;

    if !status.index_added.is_empty() || !status.index_modified.is_empty() || !status.index_deleted.is_empty() {
        anything = true;
        println!("\nChanges to be committed:");
        for path in &status.index_added {
            println!("\tnew file:   {}", path.to_str_lossy());
        }
        for path in &status.index_modified {
            println!("\tmodified:   {}", path.to_str_lossy());
        }
        for path in &status.index_deleted {
            println!("\tdeleted:    {}", path.to_str_lossy());
        }
    }

    if !status.workspace_modified.is_empty() || !status.workspace_deleted.is_empty() {
        anything = true;
        println!("\nChanges not staged for commit:");
        for path in &status.workspace_modified {
            println!("\tmodified:   {}", path.to_str_lossy());
        }
        for path in &status.workspace_deleted {
            println!("\tdeleted:    {}", path.to_str_lossy());
        }
    }

    if !status.workspace_added.is_empty() {
        anything = true;
        println!("\nUntracked files:");
        for path in &status.workspace_added {
            println!("\t{}", path.to_str_lossy());
        }
    }

    if !anything {
        println!("\nnothing to commit, working tree clean");
    }

    Ok(0)
}
