//! Checkout engine: applies a tree diff to the working tree and index.
//!
//! Two phases: a read-only conflict scan that never touches disk, then an
//! apply pass in a fixed order (deletions, then additions, then updates) so
//! that a directory being replaced by a file (or vice versa) never collides
//! with itself mid-migration.

mod error;

pub use error::MigrationError;

use std::path::{Path, PathBuf};

use bstr::{BString, ByteSlice};
use pit_diff::{Change, TreeDiff};
use pit_hash::ObjectId;
use pit_index::{Index, StatData};
use pit_object::{Blob, FileMode, Object, TreeEntry};
use pit_odb::ObjectDatabase;

/// Apply `diff` to the working tree rooted at `work_tree` and to `index`,
/// failing with [`MigrationError::CheckoutConflict`] (and mutating nothing)
/// if any touched path carries local modifications.
pub fn migrate(work_tree: &Path, odb: &ObjectDatabase, index: &mut Index, diff: &TreeDiff) -> Result<(), MigrationError> {
    detect_conflicts(work_tree, diff)?;

    for (path, change) in diff {
        if let Change::Deleted(entry) = change {
            apply_deletion(work_tree, index, path, entry)?;
        }
    }
    for (path, change) in diff {
        if let Change::Added(entry) = change {
            apply_addition(work_tree, odb, index, path, entry)?;
        }
    }
    for (path, change) in diff {
        if let Change::Updated(_, after) = change {
            apply_update(work_tree, odb, index, path, after)?;
        }
    }

    Ok(())
}

fn fs_path(work_tree: &Path, path: &BString) -> PathBuf {
    work_tree.join(path.to_str_lossy().as_ref())
}

fn current_blob_oid(path: &Path) -> std::io::Result<Option<ObjectId>> {
    match std::fs::read(path) {
        Ok(content) => Ok(Some(Object::Blob(Blob::new(content)).compute_oid())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

fn current_mode(path: &Path) -> std::io::Result<Option<FileMode>> {
    match std::fs::symlink_metadata(path) {
        Ok(meta) => Ok(Some(mode_from_metadata(&meta))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

fn mode_from_metadata(meta: &std::fs::Metadata) -> FileMode {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if meta.permissions().mode() & 0o111 != 0 {
            return FileMode::Executable;
        }
    }
    FileMode::Regular
}

fn detect_conflicts(work_tree: &Path, diff: &TreeDiff) -> Result<(), MigrationError> {
    let mut conflicts = Vec::new();

    for (path, change) in diff {
        let target = fs_path(work_tree, path);
        let matches = match change {
            Change::Added(_) => !target.exists(),
            Change::Deleted(e) => {
                let oid = current_blob_oid(&target)?;
                let mode = current_mode(&target)?;
                oid == Some(e.oid) && mode == Some(e.mode)
            }
            Change::Updated(before, _) => {
                let oid = current_blob_oid(&target)?;
                let mode = current_mode(&target)?;
                oid == Some(before.oid) && mode == Some(before.mode)
            }
        };
        if !matches {
            conflicts.push(path.clone());
        }
    }

    if conflicts.is_empty() {
        Ok(())
    } else {
        Err(MigrationError::CheckoutConflict(conflicts))
    }
}

fn apply_deletion(work_tree: &Path, index: &mut Index, path: &BString, _entry: &TreeEntry) -> Result<(), MigrationError> {
    let target = fs_path(work_tree, path);
    match std::fs::remove_file(&target) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    remove_empty_parents(work_tree, target.parent());
    index.remove_entry(path.as_bytes());
    Ok(())
}

fn remove_empty_parents(work_tree: &Path, mut dir: Option<&Path>) {
    while let Some(current) = dir {
        if current == work_tree {
            break;
        }
        match std::fs::read_dir(current) {
            Ok(mut entries) => {
                if entries.next().is_some() {
                    break;
                }
            }
            Err(_) => break,
        }
        if std::fs::remove_dir(current).is_err() {
            break;
        }
        dir = current.parent();
    }
}

fn apply_addition(
    work_tree: &Path,
    odb: &ObjectDatabase,
    index: &mut Index,
    path: &BString,
    entry: &TreeEntry,
) -> Result<(), MigrationError> {
    write_entry_to_disk(work_tree, odb, index, path, entry)
}

fn apply_update(
    work_tree: &Path,
    odb: &ObjectDatabase,
    index: &mut Index,
    path: &BString,
    entry: &TreeEntry,
) -> Result<(), MigrationError> {
    write_entry_to_disk(work_tree, odb, index, path, entry)
}

fn write_entry_to_disk(
    work_tree: &Path,
    odb: &ObjectDatabase,
    index: &mut Index,
    path: &BString,
    entry: &TreeEntry,
) -> Result<(), MigrationError> {
    let target = fs_path(work_tree, path);
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let blob = match odb.load(&entry.oid)? {
        Object::Blob(b) => b,
        _ => return Err(MigrationError::Odb(pit_odb::OdbError::Missing(entry.oid.to_hex()))),
    };
    std::fs::write(&target, &blob.data)?;
    set_mode(&target, entry.mode)?;

    let metadata = std::fs::symlink_metadata(&target)?;
    index.add_entry(path.clone(), entry.oid, entry.mode, StatData::from_metadata(&metadata));
    Ok(())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: FileMode) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let perm_bits = match mode {
        FileMode::Executable => 0o755,
        _ => 0o644,
    };
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(perm_bits))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: FileMode) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn setup() -> (tempfile::TempDir, ObjectDatabase) {
        let dir = tempfile::tempdir().unwrap();
        let odb = ObjectDatabase::init(dir.path().join("objects")).unwrap();
        (dir, odb)
    }

    fn store_blob(odb: &ObjectDatabase, data: &[u8]) -> ObjectId {
        odb.store(&Object::Blob(Blob::new(data.to_vec()))).unwrap()
    }

    #[test]
    fn addition_writes_file_and_index_entry() {
        let (dir, odb) = setup();
        let oid = store_blob(&odb, b"hello");
        let mut diff = TreeDiff::new();
        diff.insert(BString::from("a.txt"), Change::Added(TreeEntry::new(FileMode::Regular, "a.txt", oid)));
        let mut index = Index::new();

        migrate(dir.path(), &odb, &mut index, &diff).unwrap();

        assert_eq!(std::fs::read(dir.path().join("a.txt")).unwrap(), b"hello");
        assert!(index.find(b"a.txt").is_some());
    }

    #[test]
    fn addition_conflicts_with_existing_file() {
        let (dir, odb) = setup();
        let oid = store_blob(&odb, b"hello");
        std::fs::write(dir.path().join("a.txt"), b"conflicting content").unwrap();
        let mut diff = TreeDiff::new();
        diff.insert(BString::from("a.txt"), Change::Added(TreeEntry::new(FileMode::Regular, "a.txt", oid)));
        let mut index = Index::new();

        let result = migrate(dir.path(), &odb, &mut index, &diff);
        assert!(matches!(result, Err(MigrationError::CheckoutConflict(_))));
        assert_eq!(std::fs::read(dir.path().join("a.txt")).unwrap(), b"conflicting content");
    }

    #[test]
    fn deletion_removes_file_and_empty_parent() {
        let (dir, odb) = setup();
        let oid = store_blob(&odb, b"hello");
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/a.txt"), b"hello").unwrap();
        let mut index = Index::new();
        index.add_entry("sub/a.txt", oid, FileMode::Regular, StatData::default());

        let mut diff = TreeDiff::new();
        diff.insert(
            BString::from("sub/a.txt"),
            Change::Deleted(TreeEntry::new(FileMode::Regular, "a.txt", oid)),
        );

        migrate(dir.path(), &odb, &mut index, &diff).unwrap();
        assert!(!dir.path().join("sub/a.txt").exists());
        assert!(!dir.path().join("sub").exists());
        assert!(index.find(b"sub/a.txt").is_none());
    }

    #[test]
    fn deletion_conflicts_on_local_modification() {
        let (dir, odb) = setup();
        let oid = store_blob(&odb, b"original");
        std::fs::write(dir.path().join("a.txt"), b"locally modified").unwrap();
        let mut index = Index::new();
        index.add_entry("a.txt", oid, FileMode::Regular, StatData::default());

        let mut diff = TreeDiff::new();
        diff.insert(BString::from("a.txt"), Change::Deleted(TreeEntry::new(FileMode::Regular, "a.txt", oid)));

        let result = migrate(dir.path(), &odb, &mut index, &diff);
        assert!(matches!(result, Err(MigrationError::CheckoutConflict(_))));
    }

    #[test]
    fn update_overwrites_content_matching_before() {
        let (dir, odb) = setup();
        let before_oid = store_blob(&odb, b"before");
        let after_oid = store_blob(&odb, b"after");
        std::fs::write(dir.path().join("a.txt"), b"before").unwrap();
        let mut index = Index::new();
        index.add_entry("a.txt", before_oid, FileMode::Regular, StatData::default());

        let mut diff = TreeDiff::new();
        diff.insert(
            BString::from("a.txt"),
            Change::Updated(
                TreeEntry::new(FileMode::Regular, "a.txt", before_oid),
                TreeEntry::new(FileMode::Regular, "a.txt", after_oid),
            ),
        );

        migrate(dir.path(), &odb, &mut index, &diff).unwrap();
        assert_eq!(std::fs::read(dir.path().join("a.txt")).unwrap(), b"after");
        assert_eq!(index.find(b"a.txt").unwrap().oid, after_oid);
    }

    #[test]
    fn update_conflicts_when_before_does_not_match() {
        let (dir, odb) = setup();
        let before_oid = store_blob(&odb, b"before");
        let after_oid = store_blob(&odb, b"after");
        std::fs::write(dir.path().join("a.txt"), b"diverged").unwrap();
        let mut index = Index::new();

        let mut diff = TreeDiff::new();
        diff.insert(
            BString::from("a.txt"),
            Change::Updated(
                TreeEntry::new(FileMode::Regular, "a.txt", before_oid),
                TreeEntry::new(FileMode::Regular, "a.txt", after_oid),
            ),
        );

        let result = migrate(dir.path(), &odb, &mut index, &diff);
        assert!(matches!(result, Err(MigrationError::CheckoutConflict(_))));
    }

    #[test]
    fn deletions_apply_before_additions_so_file_to_dir_swap_succeeds() {
        let (dir, odb) = setup();
        let old_oid = store_blob(&odb, b"file content");
        let new_oid = store_blob(&odb, b"nested content");
        std::fs::write(dir.path().join("x"), b"file content").unwrap();
        let mut index = Index::new();
        index.add_entry("x", old_oid, FileMode::Regular, StatData::default());

        let mut diff: TreeDiff = BTreeMap::new();
        diff.insert(BString::from("x"), Change::Deleted(TreeEntry::new(FileMode::Regular, "x", old_oid)));
        diff.insert(
            BString::from("x/inner.txt"),
            Change::Added(TreeEntry::new(FileMode::Regular, "inner.txt", new_oid)),
        );

        migrate(dir.path(), &odb, &mut index, &diff).unwrap();
        assert_eq!(std::fs::read(dir.path().join("x/inner.txt")).unwrap(), b"nested content");
    }
}
