use std::collections::BTreeMap;

use bstr::ByteSlice;
use pit_hash::ObjectId;
use pit_index::{Index, IndexEntry};
use pit_object::{FileMode, Object, Tree, TreeEntry};
use pit_odb::ObjectDatabase;

use crate::RepoError;

/// An intermediate node while building the nested tree trie from flat index
/// entries: either a tracked file, or a directory of further nodes.
enum Node<'a> {
    File(&'a IndexEntry),
    Dir(BTreeMap<Vec<u8>, Node<'a>>),
}

/// Build the minimal set of tree objects describing the current index,
/// storing each in the object database, and return the root tree's oid.
pub fn build_tree_from_index(index: &Index, odb: &ObjectDatabase) -> Result<ObjectId, RepoError> {
    let mut root: BTreeMap<Vec<u8>, Node> = BTreeMap::new();

    for entry in index.iter() {
        let components: Vec<&[u8]> = entry.path.split_str(b"/").map(|s| s.as_bytes()).collect();
        insert_entry(&mut root, &components, entry);
    }

    write_tree(&root, odb)
}

fn insert_entry<'a>(dir: &mut BTreeMap<Vec<u8>, Node<'a>>, components: &[&[u8]], entry: &'a IndexEntry) {
    let (head, rest) = (components[0], &components[1..]);
    if rest.is_empty() {
        dir.insert(head.to_vec(), Node::File(entry));
        return;
    }
    let child = dir.entry(head.to_vec()).or_insert_with(|| Node::Dir(BTreeMap::new()));
    match child {
        Node::Dir(children) => insert_entry(children, rest, entry),
        Node::File(_) => unreachable!("index prefix-collision invariant guarantees no file/dir clash"),
    }
}

fn write_tree(dir: &BTreeMap<Vec<u8>, Node>, odb: &ObjectDatabase) -> Result<ObjectId, RepoError> {
    let mut entries = Vec::with_capacity(dir.len());
    for (name, node) in dir {
        let (mode, oid) = match node {
            Node::File(entry) => (entry.mode, entry.oid),
            Node::Dir(children) => (FileMode::Directory, write_tree(children, odb)?),
        };
        entries.push(TreeEntry::new(mode, name.as_slice(), oid));
    }
    let tree = Tree::new(entries);
    let oid = odb.store(&Object::Tree(tree))?;
    Ok(oid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pit_index::StatData;

    fn oid(b: u8) -> ObjectId {
        ObjectId::from_raw([b; 20])
    }

    #[test]
    fn builds_nested_tree_and_stores_blobs_separately() {
        let dir = tempfile::tempdir().unwrap();
        let odb = ObjectDatabase::init(dir.path()).unwrap();

        let blob_a = odb.store(&Object::Blob(pit_object::Blob::new(b"a".to_vec()))).unwrap();
        let blob_b = odb.store(&Object::Blob(pit_object::Blob::new(b"b".to_vec()))).unwrap();

        let mut index = Index::new();
        index.add_entry("top.txt", blob_a, FileMode::Regular, StatData::default());
        index.add_entry("dir/nested.txt", blob_b, FileMode::Regular, StatData::default());

        let root_oid = build_tree_from_index(&index, &odb).unwrap();
        let root = match odb.load(&root_oid).unwrap() {
            Object::Tree(t) => t,
            _ => panic!("expected tree"),
        };
        assert_eq!(root.entries.len(), 2);
        let dir_entry = root.find(b"dir").unwrap();
        assert_eq!(dir_entry.mode, FileMode::Directory);
        let subtree = match odb.load(&dir_entry.oid).unwrap() {
            Object::Tree(t) => t,
            _ => panic!("expected tree"),
        };
        assert_eq!(subtree.entries.len(), 1);
        assert_eq!(subtree.entries[0].name, bstr::BString::from("nested.txt"));
    }

    #[test]
    fn identical_index_yields_stable_oid() {
        let dir = tempfile::tempdir().unwrap();
        let odb = ObjectDatabase::init(dir.path()).unwrap();
        let mut index = Index::new();
        index.add_entry("a.txt", oid(1), FileMode::Regular, StatData::default());
        let first = build_tree_from_index(&index, &odb).unwrap();
        let second = build_tree_from_index(&index, &odb).unwrap();
        assert_eq!(first, second);
    }
}
