//! End-to-end coverage of the full `pit` command surface, driven through the
//! actual compiled binary.

mod common;
use common::*;

#[test]
fn init_creates_git_dir_and_main_branch() {
    let dir = tempfile::tempdir().unwrap();
    let result = pit(dir.path(), &["init"]);
    assert_eq!(result.exit_code, 0);
    assert!(dir.path().join(".git").is_dir());
    assert!(dir.path().join(".git/refs/heads").is_dir());
}

#[test]
fn init_is_idempotent_on_existing_repository() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(pit(dir.path(), &["init"]).exit_code, 0);
    assert_eq!(pit(dir.path(), &["init"]).exit_code, 0);
}

#[test]
fn add_commit_status_log_full_cycle() {
    let dir = tempfile::tempdir().unwrap();
    pit(dir.path(), &["init"]);
    std::fs::write(dir.path().join("a.txt"), "hello\n").unwrap();

    let add = pit(dir.path(), &["add", "a.txt"]);
    assert_eq!(add.exit_code, 0);

    let commit = pit(dir.path(), &["commit", "-m", "add a.txt"]);
    assert_eq!(commit.exit_code, 0, "stderr: {}", commit.stderr);
    assert!(commit.stdout.contains("add a.txt"));

    let status = pit(dir.path(), &["status"]);
    assert_eq!(status.exit_code, 0);
    assert!(status.stdout.contains("nothing to commit"));

    let log = pit(dir.path(), &["log"]);
    assert_eq!(log.exit_code, 0);
    assert!(log.stdout.contains("commit "));
    assert!(log.stdout.contains("add a.txt"));
}

#[test]
fn commit_without_message_fails_with_nonzero_exit() {
    let dir = tempfile::tempdir().unwrap();
    pit(dir.path(), &["init"]);
    std::fs::write(dir.path().join("a.txt"), "x\n").unwrap();
    pit(dir.path(), &["add", "a.txt"]);

    let result = pit(dir.path(), &["commit"]);
    assert_ne!(result.exit_code, 0);
}

#[test]
fn empty_commit_is_rejected_with_fatal_message() {
    let dir = tempfile::tempdir().unwrap();
    pit(dir.path(), &["init"]);

    let result = pit(dir.path(), &["commit", "-m", "nothing"]);
    assert_ne!(result.exit_code, 0);
    assert!(result.stderr.contains("fatal:"));
}

#[test]
fn branch_create_list_and_checkout() {
    let dir = tempfile::tempdir().unwrap();
    pit(dir.path(), &["init"]);
    std::fs::write(dir.path().join("a.txt"), "v1\n").unwrap();
    pit(dir.path(), &["add", "a.txt"]);
    pit(dir.path(), &["commit", "-m", "first"]);

    assert_eq!(pit(dir.path(), &["branch", "feature"]).exit_code, 0);

    let list = pit(dir.path(), &["branch"]);
    assert!(list.stdout.contains("feature"));
    assert!(list.stdout.contains("* main"));

    let checkout = pit(dir.path(), &["checkout", "feature"]);
    assert_eq!(checkout.exit_code, 0, "stderr: {}", checkout.stderr);

    let list_after = pit(dir.path(), &["branch"]);
    assert!(list_after.stdout.contains("* feature"));
}

#[test]
fn checkout_refuses_to_clobber_dirty_file() {
    let dir = tempfile::tempdir().unwrap();
    pit(dir.path(), &["init"]);
    std::fs::write(dir.path().join("a.txt"), "v1\n").unwrap();
    pit(dir.path(), &["add", "a.txt"]);
    pit(dir.path(), &["commit", "-m", "first"]);
    pit(dir.path(), &["branch", "feature"]);

    std::fs::write(dir.path().join("a.txt"), "v2\n").unwrap();
    pit(dir.path(), &["add", "a.txt"]);
    pit(dir.path(), &["commit", "-m", "second"]);

    std::fs::write(dir.path().join("a.txt"), "dirty uncommitted edit\n").unwrap();
    let checkout = pit(dir.path(), &["checkout", "feature"]);
    assert_ne!(checkout.exit_code, 0);
    assert_eq!(std::fs::read_to_string(dir.path().join("a.txt")).unwrap(), "dirty uncommitted edit\n");
}

#[test]
fn diff_reports_added_file_between_index_and_head() {
    let dir = tempfile::tempdir().unwrap();
    pit(dir.path(), &["init"]);
    std::fs::write(dir.path().join("a.txt"), "v1\n").unwrap();
    pit(dir.path(), &["add", "a.txt"]);
    pit(dir.path(), &["commit", "-m", "first"]);

    std::fs::write(dir.path().join("b.txt"), "new file\n").unwrap();
    pit(dir.path(), &["add", "b.txt"]);

    let diff = pit(dir.path(), &["diff", "--cached"]);
    assert_eq!(diff.exit_code, 0);
    assert!(diff.stdout.contains("A\tb.txt"));
}

#[test]
fn status_reports_untracked_file_before_staging() {
    let dir = tempfile::tempdir().unwrap();
    pit(dir.path(), &["init"]);
    std::fs::write(dir.path().join("new.txt"), "x\n").unwrap();

    let status = pit(dir.path(), &["status"]);
    assert!(status.stdout.contains("Untracked files"));
    assert!(status.stdout.contains("new.txt"));
}
