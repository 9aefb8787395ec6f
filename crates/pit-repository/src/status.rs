use std::collections::BTreeMap;
use std::path::Path;

use bstr::{BString, ByteSlice};
use pit_hash::ObjectId;
use pit_index::Index;
use pit_object::{Object, TreeEntry};
use pit_odb::ObjectDatabase;

use crate::RepoError;

/// The disjoint projections produced by cross-comparing the working tree,
/// the staging index, and the HEAD commit's tree.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StatusGroup {
    pub workspace_modified: Vec<BString>,
    pub workspace_added: Vec<BString>,
    pub workspace_deleted: Vec<BString>,
    pub index_added: Vec<BString>,
    pub index_modified: Vec<BString>,
    pub index_deleted: Vec<BString>,
}

/// Segment-match-only ignore rules: the literal `.git` directory plus every
/// non-blank, non-comment line of `.gitignore` at the repository root. No
/// glob support; a rule matches only an exact path component.
pub struct IgnoreRules {
    patterns: Vec<String>,
}

impl IgnoreRules {
    pub fn load(work_tree: &Path) -> std::io::Result<Self> {
        let mut patterns = Vec::new();
        match std::fs::read_to_string(work_tree.join(".gitignore")) {
            Ok(contents) => {
                for line in contents.lines() {
                    let line = line.trim();
                    if !line.is_empty() && !line.starts_with('#') {
                        patterns.push(line.to_string());
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        Ok(Self { patterns })
    }

    pub(crate) fn is_ignored_segment(&self, segment: &str) -> bool {
        segment == ".git" || self.patterns.iter().any(|p| p == segment)
    }
}

/// Recursively flatten a tree object into a flat `path -> TreeEntry` map,
/// using `/` to join path components.
pub fn flatten_tree(odb: &ObjectDatabase, tree_oid: Option<ObjectId>) -> Result<BTreeMap<BString, TreeEntry>, RepoError> {
    let mut out = BTreeMap::new();
    if let Some(oid) = tree_oid {
        flatten_into(odb, oid, &mut Vec::new(), &mut out)?;
    }
    Ok(out)
}

fn flatten_into(
    odb: &ObjectDatabase,
    tree_oid: ObjectId,
    prefix: &mut Vec<u8>,
    out: &mut BTreeMap<BString, TreeEntry>,
) -> Result<(), RepoError> {
    let tree = match odb.load(&tree_oid)? {
        Object::Tree(t) => t,
        _ => return Ok(()),
    };
    for entry in &tree.entries {
        let start_len = prefix.len();
        if !prefix.is_empty() {
            prefix.push(b'/');
        }
        prefix.extend_from_slice(entry.name.as_bytes());

        if entry.mode.is_tree() {
            flatten_into(odb, entry.oid, prefix, out)?;
        } else {
            out.insert(BString::from(prefix.clone()), entry.clone());
        }
        prefix.truncate(start_len);
    }
    Ok(())
}

/// Compute the full status projection.
pub fn compute_status(
    work_tree: &Path,
    index: &Index,
    odb: &ObjectDatabase,
    head_tree_oid: Option<ObjectId>,
) -> Result<StatusGroup, RepoError> {
    let head_entries = flatten_tree(odb, head_tree_oid)?;
    let mut status = StatusGroup::default();

    for entry in index.iter() {
        let fs_path = work_tree.join(entry.path.to_str_lossy().as_ref());
        if !fs_path.exists() {
            status.workspace_deleted.push(entry.path.clone());
        } else if index.has_modified(work_tree, entry.path.as_bytes())? {
            status.workspace_modified.push(entry.path.clone());
        }

        match head_entries.get(&entry.path) {
            None => status.index_added.push(entry.path.clone()),
            Some(head_entry) => {
                if head_entry.oid != entry.oid || head_entry.mode != entry.mode {
                    status.index_modified.push(entry.path.clone());
                }
            }
        }
    }

    for path in head_entries.keys() {
        if index.find(path.as_bytes()).is_none() {
            status.index_deleted.push(path.clone());
        }
    }

    let ignore = IgnoreRules::load(work_tree)?;
    let mut prefix = Vec::new();
    collect_untracked(work_tree, &mut prefix, index, &ignore, &mut status.workspace_added)?;

    Ok(status)
}

fn collect_untracked(
    dir: &Path,
    rel: &mut Vec<u8>,
    index: &Index,
    ignore: &IgnoreRules,
    out: &mut Vec<BString>,
) -> Result<(), RepoError> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)?.collect::<std::io::Result<_>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let name = entry.file_name();
        let Some(name_str) = name.to_str() else { continue };
        if ignore.is_ignored_segment(name_str) {
            continue;
        }

        let start_len = rel.len();
        if !rel.is_empty() {
            rel.push(b'/');
        }
        rel.extend_from_slice(name_str.as_bytes());

        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            if index.has_tracked(rel) {
                collect_untracked(&entry.path(), rel, index, ignore, out)?;
            } else {
                let mut dir_path = rel.clone();
                dir_path.push(b'/');
                out.push(BString::from(dir_path));
            }
        } else if !index.has_tracked(rel) {
            out.push(BString::from(rel.clone()));
        }

        rel.truncate(start_len);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pit_index::StatData;
    use pit_object::{Blob, FileMode};

    fn setup() -> (tempfile::TempDir, ObjectDatabase) {
        let dir = tempfile::tempdir().unwrap();
        let odb = ObjectDatabase::init(dir.path().join("objects")).unwrap();
        (dir, odb)
    }

    #[test]
    fn workspace_added_reports_untracked_file() {
        let (dir, odb) = setup();
        std::fs::write(dir.path().join("new.txt"), b"hi").unwrap();
        let index = Index::new();
        let status = compute_status(dir.path(), &index, &odb, None).unwrap();
        assert_eq!(status.workspace_added, vec![BString::from("new.txt")]);
    }

    #[test]
    fn workspace_added_reports_shallowest_untracked_dir() {
        let (dir, odb) = setup();
        std::fs::create_dir_all(dir.path().join("sub/deeper")).unwrap();
        std::fs::write(dir.path().join("sub/deeper/f.txt"), b"hi").unwrap();
        let index = Index::new();
        let status = compute_status(dir.path(), &index, &odb, None).unwrap();
        assert_eq!(status.workspace_added, vec![BString::from("sub/")]);
    }

    #[test]
    fn workspace_deleted_when_tracked_file_removed() {
        let (dir, odb) = setup();
        let blob = odb.store(&Object::Blob(Blob::new(b"x".to_vec()))).unwrap();
        let mut index = Index::new();
        index.add_entry("a.txt", blob, FileMode::Regular, StatData::default());
        let status = compute_status(dir.path(), &index, &odb, None).unwrap();
        assert_eq!(status.workspace_deleted, vec![BString::from("a.txt")]);
        assert_eq!(status.index_added, vec![BString::from("a.txt")]);
    }

    #[test]
    fn ignores_git_directory() {
        let (dir, odb) = setup();
        std::fs::create_dir_all(dir.path().join(".git")).unwrap();
        std::fs::write(dir.path().join(".git").join("HEAD"), b"ref: refs/heads/main\n").unwrap();
        let index = Index::new();
        let status = compute_status(dir.path(), &index, &odb, None).unwrap();
        assert!(status.workspace_added.is_empty());
    }
}
