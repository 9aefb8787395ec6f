use bstr::BString;
use pit_diff::diff_trees;
use pit_migration::{migrate, MigrationError};
use pit_repository::{add_all, create_commit, status::IgnoreRules, CommitOptions, Repository};

fn new_repo() -> (tempfile::TempDir, Repository) {
    let dir = tempfile::tempdir().unwrap();
    let repo = Repository::init(dir.path()).unwrap();
    (dir, repo)
}

fn commit_file(repo: &mut Repository, work_tree: &std::path::Path, name: &str, content: &[u8], message: &str) {
    std::fs::write(work_tree.join(name), content).unwrap();
    let ignore = IgnoreRules::load(work_tree).unwrap();
    add_all(repo, work_tree, &ignore, false).unwrap();
    repo.write_index().unwrap();
    create_commit(
        repo,
        &CommitOptions {
            message: BString::from(message),
            allow_empty: false,
        },
    )
    .unwrap();
}

/// Spec S5: checking out a revision that would overwrite a locally-modified
/// file is refused wholesale, HEAD stays put, and the dirty content survives
/// untouched on disk.
#[test]
fn s5_dirty_file_blocks_checkout_and_preserves_content() {
    let (dir, mut repo) = new_repo();
    commit_file(&mut repo, dir.path(), "a.txt", b"version one\n", "first\n");
    let first = repo.head_oid().unwrap().unwrap();

    commit_file(&mut repo, dir.path(), "a.txt", b"version two\n", "second\n");
    let second = repo.head_oid().unwrap().unwrap();
    assert_ne!(first, second);

    // Dirty the working tree beyond what either commit recorded.
    std::fs::write(dir.path().join("a.txt"), b"dirty local edit\n").unwrap();

    let first_tree = match repo.odb().load(&first).unwrap() {
        pit_object::Object::Commit(c) => c.tree,
        _ => panic!("expected commit"),
    };
    let second_tree = repo.head_tree_oid().unwrap().unwrap();

    let diff = diff_trees(repo.odb(), Some(&second_tree), Some(&first_tree)).unwrap();
    let mut index = repo.index().unwrap().clone();

    let result = migrate(dir.path(), repo.odb(), &mut index, &diff);
    assert!(matches!(result, Err(MigrationError::CheckoutConflict(_))));

    // HEAD must not have moved, and the dirty content is left exactly as-is.
    assert_eq!(repo.head_oid().unwrap(), Some(second));
    assert_eq!(std::fs::read(dir.path().join("a.txt")).unwrap(), b"dirty local edit\n");
}

/// A clean checkout between two real commits updates the file content and
/// the index entry to match the target tree.
#[test]
fn clean_checkout_between_commits_succeeds() {
    let (dir, mut repo) = new_repo();
    commit_file(&mut repo, dir.path(), "a.txt", b"version one\n", "first\n");
    let first = repo.head_oid().unwrap().unwrap();
    let first_tree = match repo.odb().load(&first).unwrap() {
        pit_object::Object::Commit(c) => c.tree,
        _ => panic!("expected commit"),
    };

    commit_file(&mut repo, dir.path(), "a.txt", b"version two\n", "second\n");
    let second_tree = repo.head_tree_oid().unwrap().unwrap();

    let diff = diff_trees(repo.odb(), Some(&second_tree), Some(&first_tree)).unwrap();
    let mut index = repo.index().unwrap().clone();
    migrate(dir.path(), repo.odb(), &mut index, &diff).unwrap();

    assert_eq!(std::fs::read(dir.path().join("a.txt")).unwrap(), b"version one\n");
    assert_eq!(index.find(b"a.txt").unwrap().oid, match repo.odb().load(&first_tree).unwrap() {
        pit_object::Object::Tree(t) => t.find(b"a.txt").unwrap().oid,
        _ => panic!("expected tree"),
    });
}
