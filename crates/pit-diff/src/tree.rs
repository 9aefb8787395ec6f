use std::cmp::Ordering;

use bstr::BString;
use pit_hash::ObjectId;
use pit_object::{Object, Tree, TreeEntry};
use pit_odb::ObjectDatabase;

use crate::{Change, DiffError, TreeDiff};

/// Diff two trees, producing a flat map of path to change.
///
/// Either `old_tree` or `new_tree` may be `None`, representing an empty tree
/// (e.g. the parentless side of an initial commit's diff).
pub fn diff_trees(
    odb: &ObjectDatabase,
    old_tree: Option<&ObjectId>,
    new_tree: Option<&ObjectId>,
) -> Result<TreeDiff, DiffError> {
    let old = match old_tree {
        Some(oid) => Some(read_tree(odb, oid)?),
        None => None,
    };
    let new = match new_tree {
        Some(oid) => Some(read_tree(odb, oid)?),
        None => None,
    };

    let old_entries = old.as_ref().map_or(&[][..], |t| &t.entries);
    let new_entries = new.as_ref().map_or(&[][..], |t| &t.entries);

    let mut out = TreeDiff::new();
    diff_entries(odb, old_entries, new_entries, &BString::from(""), &mut out)?;
    Ok(out)
}

fn read_tree(odb: &ObjectDatabase, oid: &ObjectId) -> Result<Tree, DiffError> {
    match odb.load(oid) {
        Ok(Object::Tree(tree)) => Ok(tree),
        Ok(_) => Err(DiffError::NotATree(*oid)),
        Err(pit_odb::OdbError::Missing(_)) => Err(DiffError::ObjectNotFound(*oid)),
        Err(e) => Err(e.into()),
    }
}

fn full_path(prefix: &BString, name: &[u8]) -> BString {
    if prefix.is_empty() {
        BString::from(name)
    } else {
        let mut p = prefix.clone();
        p.push(b'/');
        p.extend_from_slice(name);
        p
    }
}

/// Walk two sorted entry slices in lockstep (git's tree entry order),
/// recursing into subtrees and collecting flat path -> Change entries.
fn diff_entries(
    odb: &ObjectDatabase,
    old_entries: &[TreeEntry],
    new_entries: &[TreeEntry],
    prefix: &BString,
    out: &mut TreeDiff,
) -> Result<(), DiffError> {
    let mut oi = 0;
    let mut ni = 0;

    while oi < old_entries.len() || ni < new_entries.len() {
        match (old_entries.get(oi), new_entries.get(ni)) {
            (Some(old_entry), Some(new_entry)) => match TreeEntry::cmp_entries(old_entry, new_entry) {
                Ordering::Less => {
                    collect_deleted(odb, old_entry, prefix, out)?;
                    oi += 1;
                }
                Ordering::Greater => {
                    collect_added(odb, new_entry, prefix, out)?;
                    ni += 1;
                }
                Ordering::Equal => {
                    collect_matched(odb, old_entry, new_entry, prefix, out)?;
                    oi += 1;
                    ni += 1;
                }
            },
            (Some(old_entry), None) => {
                collect_deleted(odb, old_entry, prefix, out)?;
                oi += 1;
            }
            (None, Some(new_entry)) => {
                collect_added(odb, new_entry, prefix, out)?;
                ni += 1;
            }
            (None, None) => break,
        }
    }

    Ok(())
}

fn collect_added(
    odb: &ObjectDatabase,
    entry: &TreeEntry,
    prefix: &BString,
    out: &mut TreeDiff,
) -> Result<(), DiffError> {
    let path = full_path(prefix, entry.name.as_ref());
    if entry.mode.is_tree() {
        let tree = read_tree(odb, &entry.oid)?;
        diff_entries(odb, &[], &tree.entries, &path, out)?;
    } else {
        out.insert(path, Change::Added(entry.clone()));
    }
    Ok(())
}

fn collect_deleted(
    odb: &ObjectDatabase,
    entry: &TreeEntry,
    prefix: &BString,
    out: &mut TreeDiff,
) -> Result<(), DiffError> {
    let path = full_path(prefix, entry.name.as_ref());
    if entry.mode.is_tree() {
        let tree = read_tree(odb, &entry.oid)?;
        diff_entries(odb, &tree.entries, &[], &path, out)?;
    } else {
        out.insert(path, Change::Deleted(entry.clone()));
    }
    Ok(())
}

fn collect_matched(
    odb: &ObjectDatabase,
    old_entry: &TreeEntry,
    new_entry: &TreeEntry,
    prefix: &BString,
    out: &mut TreeDiff,
) -> Result<(), DiffError> {
    let path = full_path(prefix, old_entry.name.as_ref());
    let old_is_tree = old_entry.mode.is_tree();
    let new_is_tree = new_entry.mode.is_tree();

    // `cmp_entries` sorts directories as if suffixed with `/`, so a
    // same-named file and directory never compare Equal and never reach
    // here; the type-change case is handled entirely by the Less/Greater
    // branches in `diff_entries`. Both sides are therefore always the
    // same kind below.
    debug_assert_eq!(old_is_tree, new_is_tree);

    if old_is_tree {
        if old_entry.oid != new_entry.oid {
            let old_tree = read_tree(odb, &old_entry.oid)?;
            let new_tree = read_tree(odb, &new_entry.oid)?;
            diff_entries(odb, &old_tree.entries, &new_tree.entries, &path, out)?;
        }
    } else if old_entry.oid != new_entry.oid || old_entry.mode != new_entry.mode {
        out.insert(path, Change::Updated(old_entry.clone(), new_entry.clone()));
    }

    Ok(())
}
