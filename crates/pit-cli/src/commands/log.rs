use anyhow::Result;
use bstr::ByteSlice;
use clap::Args;

use super::open_repo;
use crate::Cli;

#[derive(Args)]
pub struct LogArgs {
    /// Revision to start walking from (defaults to HEAD)
    revision: Option<String>,
}

pub fn run(args: &LogArgs, cli: &Cli) -> Result<i32> {
    let repo = open_repo(cli)?;

    let start = match &args.revision {
        Some(rev) => Some(pit_revision::resolve(repo.refs(), repo.odb(), rev)?),
        None => repo.head_oid()?,
    };

    let mut current = start;
    while let Some(oid) = current {
        let commit = match repo.odb().load(&oid)? {
            pit_object::Object::Commit(c) => c,
            _ => break,
        };

        println!("commit {}", oid.to_hex());
        println!("Author: {} <{}>", commit.author.name, commit.author.email);
        println!();
        for line in commit.message.as_bytes().lines() {
            println!("    {}", line.to_str_lossy());
        }
        println!();

        current = commit.parent;
    }

    Ok(0)
}
