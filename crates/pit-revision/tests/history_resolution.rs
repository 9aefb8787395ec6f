use pit_object::{Commit, Object};
use pit_odb::ObjectDatabase;
use pit_ref::RefStore;
use pit_revision::{resolve, RevisionError};
use pit_utils::Signature;

fn setup() -> (tempfile::TempDir, ObjectDatabase, RefStore) {
    let dir = tempfile::tempdir().unwrap();
    let odb = ObjectDatabase::init(dir.path().join("objects")).unwrap();
    let refs = RefStore::open(dir.path());
    refs.init("main").unwrap();
    (dir, odb, refs)
}

/// Build a five-commit chain on `main`, each pointing at the same (unused)
/// tree, and return their oids oldest-first.
fn build_history(odb: &ObjectDatabase, refs: &RefStore) -> Vec<pit_hash::ObjectId> {
    let tree = odb.store(&Object::Blob(pit_object::Blob::new(b"placeholder".to_vec()))).unwrap();
    let sig = Signature::new("A", "a@b.c", 1_700_000_000, 0);
    let mut parent = None;
    let mut oids = Vec::new();
    for i in 0..5 {
        let commit = Commit::new(tree, parent, sig.clone(), sig.clone(), format!("commit {i}\n"));
        let oid = odb.store(&Object::Commit(commit)).unwrap();
        oids.push(oid);
        parent = Some(oid);
    }
    refs.create_branch("main", *oids.last().unwrap()).unwrap();
    oids
}

/// Spec S6: a chain of `^`/`~` parent-walk steps, with any mix of caret and
/// tilde spellings, sums to the same number of steps walked from HEAD.
#[test]
fn s6_mixed_caret_tilde_chain_sums_steps() {
    let (_dir, odb, refs) = setup();
    let oids = build_history(&odb, &refs);

    assert_eq!(resolve(&refs, &odb, "HEAD").unwrap(), oids[4]);
    assert_eq!(resolve(&refs, &odb, "HEAD^").unwrap(), oids[3]);
    assert_eq!(resolve(&refs, &odb, "HEAD~1").unwrap(), oids[3]);
    assert_eq!(resolve(&refs, &odb, "HEAD^^").unwrap(), oids[2]);
    assert_eq!(resolve(&refs, &odb, "HEAD~2").unwrap(), oids[2]);
    assert_eq!(resolve(&refs, &odb, "HEAD^~3").unwrap(), oids[0]);
    assert_eq!(resolve(&refs, &odb, "main~4").unwrap(), oids[0]);
}

/// Resolving via an abbreviated oid prefix walks the same parent chain as
/// resolving via the branch name it happens to match.
#[test]
fn oid_prefix_and_branch_name_agree_after_walking() {
    let (_dir, odb, refs) = setup();
    let oids = build_history(&odb, &refs);
    let prefix = &oids[4].to_hex()[..10];

    assert_eq!(resolve(&refs, &odb, &format!("{prefix}~2")).unwrap(), resolve(&refs, &odb, "main~2").unwrap());
}

/// Walking one step past the root commit is an unknown revision, not a panic
/// or a silent wraparound.
#[test]
fn walking_past_root_is_unknown() {
    let (_dir, odb, refs) = setup();
    build_history(&odb, &refs);
    assert!(matches!(resolve(&refs, &odb, "HEAD~5"), Err(RevisionError::UnknownRevision(_))));
}
