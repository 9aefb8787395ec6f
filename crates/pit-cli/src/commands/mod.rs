pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod diff;
pub mod init;
pub mod log;
pub mod status;

use anyhow::Result;
use clap::Subcommand;

use crate::Cli;

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty repository
    Init(init::InitArgs),
    /// Add file contents to the index
    Add(add::AddArgs),
    /// Record changes to the repository
    Commit(commit::CommitArgs),
    /// Show the working tree and index status
    Status(status::StatusArgs),
    /// Show changes between the index, HEAD, and the working tree
    Diff(diff::DiffArgs),
    /// List, create, or delete branches
    Branch(branch::BranchArgs),
    /// Switch branches or check out a commit
    Checkout(checkout::CheckoutArgs),
    /// Show commit logs
    Log(log::LogArgs),
}

/// Open a repository, discovered by walking up from the current directory.
pub fn open_repo(_cli: &Cli) -> Result<pit_repository::Repository> {
    Ok(pit_repository::Repository::discover(std::env::current_dir()?)?)
}

pub fn run(cli: Cli) -> Result<i32> {
    match &cli.command {
        Commands::Init(args) => init::run(args, &cli),
        Commands::Add(args) => add::run(args, &cli),
        Commands::Commit(args) => commit::run(args, &cli),
        Commands::Status(args) => status::run(args, &cli),
        Commands::Diff(args) => diff::run(args, &cli),
        Commands::Branch(args) => branch::run(args, &cli),
        Commands::Checkout(args) => checkout::run(args, &cli),
        Commands::Log(args) => log::run(args, &cli),
    }
}
