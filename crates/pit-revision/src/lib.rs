//! Revision expression parsing and resolution: `HEAD`, `@`, branch names, and
//! abbreviated object ids, each optionally followed by a chain of `^`/`~`
//! parent-walk steps.

mod error;
mod parse;

pub use error::RevisionError;
pub use parse::{parse_revision, RevisionExpr, Step};

use pit_hash::ObjectId;
use pit_object::Object;
use pit_odb::ObjectDatabase;
use pit_ref::RefStore;

/// Resolve a revision expression to the commit oid it names.
pub fn resolve(refs: &RefStore, odb: &ObjectDatabase, expr: &str) -> Result<ObjectId, RevisionError> {
    let parsed = parse_revision(expr)?;
    let base_oid = resolve_base(refs, odb, &parsed.base)?;

    walk_parents(odb, base_oid, parsed.total_steps(), expr)
}

fn resolve_base(refs: &RefStore, odb: &ObjectDatabase, base: &str) -> Result<ObjectId, RevisionError> {
    if base == "HEAD" || base == "@" {
        return refs
            .read_head()?
            .ok_or_else(|| RevisionError::UnknownRevision(base.to_string()));
    }

    if let Some(oid) = refs.branch_oid(base)? {
        return Ok(oid);
    }

    if is_hex_prefix(base) {
        return match odb.prefix_match(base) {
            Ok(oid) => Ok(oid),
            Err(pit_odb::OdbError::UnknownRevision(_)) => Err(RevisionError::UnknownRevision(base.to_string())),
            Err(pit_odb::OdbError::AmbiguousRevision(_)) => Err(RevisionError::AmbiguousRevision(base.to_string())),
            Err(e) => Err(e.into()),
        };
    }

    Err(RevisionError::UnknownRevision(base.to_string()))
}

fn walk_parents(odb: &ObjectDatabase, start: ObjectId, steps: u64, expr: &str) -> Result<ObjectId, RevisionError> {
    let mut current = start;
    for _ in 0..steps {
        match odb.load(&current)? {
            Object::Commit(commit) => match commit.parent {
                Some(parent) => current = parent,
                None => return Err(RevisionError::UnknownRevision(expr.to_string())),
            },
            _ => return Err(RevisionError::InvalidRevision(expr.to_string())),
        }
    }

    // The base itself must resolve to a commit even with zero steps.
    match odb.load(&current)? {
        Object::Commit(_) => Ok(current),
        _ => Err(RevisionError::InvalidRevision(expr.to_string())),
    }
}

fn is_hex_prefix(s: &str) -> bool {
    !s.is_empty() && s.len() <= 40 && s.bytes().all(|b| b.is_ascii_hexdigit())
}
