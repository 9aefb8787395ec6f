use bstr::BString;
use pit_hash::ObjectId;
use pit_object::{Commit, Object};
use pit_utils::Signature;

use crate::{tree_builder, Repository, RepoError};

/// Inputs to commit creation beyond what's already staged in the index.
#[derive(Debug, Clone)]
pub struct CommitOptions {
    pub message: BString,
    pub allow_empty: bool,
}

/// Build a tree from the current index, and record a commit pointing at it
/// as the next entry in the current branch's history.
///
/// A commit whose tree is identical to its parent's is rejected as
/// `NothingToCommit` unless `allow_empty` is set, matching git's default
/// refusal of no-op commits (including the very first commit on an unborn
/// branch, whose "parent tree" is the empty tree).
pub fn create_commit(repo: &mut Repository, opts: &CommitOptions) -> Result<ObjectId, RepoError> {
    let parent = repo.head_oid()?;

    let parent_tree = match parent {
        Some(oid) => match repo.odb().load(&oid)? {
            Object::Commit(c) => Some(c.tree),
            _ => return Err(RepoError::CorruptHead),
        },
        None => None,
    };

    let index = repo.index()?.clone();
    let tree_oid = tree_builder::build_tree_from_index(&index, repo.odb())?;

    if !opts.allow_empty && parent_tree == Some(tree_oid) {
        return Err(RepoError::NothingToCommit);
    }
    if !opts.allow_empty && parent.is_none() && index.entries.is_empty() {
        return Err(RepoError::NothingToCommit);
    }

    // Author and committer lines use identical bytes in this core (§3.4):
    // build the signature once and reuse it verbatim for both.
    let author = author_signature();
    let committer = author.clone();

    let commit = Commit::new(tree_oid, parent, author, committer, opts.message.clone());
    let oid = repo.odb().store(&Object::Commit(commit))?;

    repo.refs().update_head_via_ref(oid)?;

    Ok(oid)
}

fn author_signature() -> Signature {
    let name = std::env::var("GIT_AUTHOR_NAME").unwrap_or_else(|_| "Unknown".to_string());
    let email = std::env::var("GIT_AUTHOR_EMAIL").unwrap_or_else(|_| "unknown@unknown".to_string());
    Signature::now(name, email)
}
