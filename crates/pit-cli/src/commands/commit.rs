use anyhow::{bail, Result};
use bstr::BString;
use clap::Args;

use super::open_repo;
use crate::Cli;

#[derive(Args)]
pub struct CommitArgs {
    /// Use the given message as the commit message
    #[arg(short, long, value_name = "msg")]
    message: Option<String>,

    /// Allow recording a commit with no changes
    #[arg(long)]
    allow_empty: bool,
}

pub fn run(args: &CommitArgs, cli: &Cli) -> Result<i32> {
    let message = match &args.message {
        Some(m) => m.clone(),
        None => bail!("no commit message given; pass -m <msg>"),
    };

    let mut repo = open_repo(cli)?;
    let branch = repo.current_branch()?;

    let oid = pit_repository::create_commit(
        &mut repo,
        &pit_repository::CommitOptions {
            message: BString::from(message.as_str()),
            allow_empty: args.allow_empty,
        },
    )?;

    let summary = message.lines().next().unwrap_or("");
    match branch {
        Some(name) => println!("[{} {}] {}", name, oid.short_hex(), summary),
        None => println!("[detached HEAD {}] {}", oid.short_hex(), summary),
    }

    Ok(0)
}
