/// Real file tests for the sync engine
///
/// Each test builds a source tree and a document root on disk, runs a sync,
/// and checks both the returned report and the resulting tree.
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use filetime::FileTime;
use tempfile::TempDir;

use docsync::{ExclusionFilter, SyncEngine, SyncError, SyncPolicy};

/// Helper to create a file, including its parent directories
fn create_file(dir: &Path, rel: &str, content: &str) {
	let path = dir.join(rel);
	fs::create_dir_all(path.parent().unwrap()).unwrap();
	fs::write(&path, content).unwrap();
}

/// Helper to pin a file's mtime to a unix timestamp
fn set_mtime(dir: &Path, rel: &str, secs: i64) {
	filetime::set_file_mtime(dir.join(rel), FileTime::from_unix_time(secs, 0)).unwrap();
}

fn engine(root: &Path) -> SyncEngine {
	SyncEngine::new(root, Arc::new(ExclusionFilter::with_defaults().unwrap()))
}

fn sorted(mut v: Vec<String>) -> Vec<String> {
	v.sort();
	v
}

// ===================================================================
// INCREMENTAL
// ===================================================================

#[test]
fn test_incremental_scenario() {
	let root = TempDir::new().unwrap();
	let source = TempDir::new().unwrap();

	create_file(source.path(), "a.txt", "hello");
	create_file(source.path(), "sub/b.txt", "bee");

	create_file(root.path(), "docs/a.txt", "HELLO");
	create_file(root.path(), "docs/c.txt", "stale");
	fs::create_dir_all(root.path().join("docs/sub")).unwrap();
	// Same size and the source is not strictly newer: left alone
	set_mtime(root.path(), "docs/a.txt", 1_600_000_000);
	set_mtime(source.path(), "a.txt", 1_500_000_000);

	let report = engine(root.path()).sync(source.path(), "docs", SyncPolicy::Incremental).unwrap();

	assert_eq!(report.copied, vec!["sub/b.txt"]);
	assert_eq!(report.deleted, vec!["c.txt"]);
	assert!(report.errors.is_empty());
	assert_eq!(fs::read_to_string(root.path().join("docs/a.txt")).unwrap(), "HELLO");
	assert_eq!(fs::read_to_string(root.path().join("docs/sub/b.txt")).unwrap(), "bee");
	assert!(!root.path().join("docs/c.txt").exists());
	assert!(root.path().join("docs/sub").is_dir());
}

#[test]
fn test_incremental_copies_newer_source() {
	let root = TempDir::new().unwrap();
	let source = TempDir::new().unwrap();

	create_file(source.path(), "a.txt", "new!!");
	create_file(root.path(), "a.txt", "old!!");
	set_mtime(root.path(), "a.txt", 1_600_000_000);
	set_mtime(source.path(), "a.txt", 1_700_000_000);

	let report = engine(root.path()).sync(source.path(), "", SyncPolicy::Incremental).unwrap();

	assert_eq!(report.copied, vec!["a.txt"]);
	assert_eq!(fs::read_to_string(root.path().join("a.txt")).unwrap(), "new!!");
	let meta = fs::metadata(root.path().join("a.txt")).unwrap();
	assert_eq!(FileTime::from_last_modification_time(&meta).unix_seconds(), 1_700_000_000);
}

#[test]
fn test_incremental_is_idempotent() {
	let root = TempDir::new().unwrap();
	let source = TempDir::new().unwrap();
	create_file(source.path(), "a.txt", "a");
	create_file(source.path(), "deep/er/b.txt", "b");
	create_file(root.path(), "target/old.txt", "old");

	let engine = engine(root.path());
	let first = engine.sync(source.path(), "target", SyncPolicy::Incremental).unwrap();
	assert_eq!(sorted(first.copied), vec!["a.txt", "deep/er/b.txt"]);
	assert_eq!(first.deleted, vec!["old.txt"]);

	let second = engine.sync(source.path(), "target", SyncPolicy::Incremental).unwrap();
	assert!(second.is_noop());
	assert!(second.errors.is_empty());
	assert_eq!(second.unchanged, 2);
}

#[test]
fn test_incremental_prunes_emptied_directories() {
	let root = TempDir::new().unwrap();
	let source = TempDir::new().unwrap();
	create_file(source.path(), "keep.txt", "k");

	create_file(root.path(), "old/nested/gone.txt", "g");
	create_file(root.path(), "other/.DS_Store", "x");

	let report = engine(root.path()).sync(source.path(), "", SyncPolicy::Incremental).unwrap();

	assert_eq!(report.deleted, vec!["old/nested/gone.txt"]);
	assert!(!root.path().join("old").exists());
	// Holds an excluded file, so it is not empty on disk
	assert!(root.path().join("other/.DS_Store").exists());
	assert!(root.path().is_dir());
}

#[test]
fn test_exclusions_are_never_touched() {
	let root = TempDir::new().unwrap();
	let source = TempDir::new().unwrap();
	create_file(source.path(), "doc.md", "d");
	create_file(source.path(), ".DS_Store", "mac");
	create_file(source.path(), "__pycache__/mod.pyc", "pyc");
	create_file(source.path(), ".ruff_cache/state", "c");

	create_file(root.path(), ".git/HEAD", "ref");
	create_file(root.path(), ".DS_Store", "target mac");
	create_file(root.path(), "$RECYCLE.BIN/junk", "j");

	let report = engine(root.path()).sync(source.path(), "", SyncPolicy::Incremental).unwrap();

	assert_eq!(report.copied, vec!["doc.md"]);
	assert!(report.deleted.is_empty());
	assert!(!root.path().join("__pycache__").exists());
	assert!(!root.path().join(".ruff_cache").exists());
	assert_eq!(fs::read_to_string(root.path().join(".DS_Store")).unwrap(), "target mac");
	assert!(root.path().join(".git/HEAD").exists());
	assert!(root.path().join("$RECYCLE.BIN/junk").exists());
}

#[test]
fn test_incremental_replaces_directory_with_file() {
	let root = TempDir::new().unwrap();
	let source = TempDir::new().unwrap();
	create_file(source.path(), "notes", "now a file");
	create_file(root.path(), "notes/old.txt", "old");

	let report = engine(root.path()).sync(source.path(), "", SyncPolicy::Incremental).unwrap();

	assert_eq!(report.copied, vec!["notes"]);
	assert_eq!(report.deleted, vec!["notes/"]);
	assert!(report.errors.is_empty());
	assert!(root.path().join("notes").is_file());
	assert_eq!(fs::read_to_string(root.path().join("notes")).unwrap(), "now a file");
}

#[test]
fn test_incremental_replaces_file_with_directory() {
	let root = TempDir::new().unwrap();
	let source = TempDir::new().unwrap();
	create_file(source.path(), "x/y.txt", "why");
	create_file(root.path(), "x", "was a file");

	let report = engine(root.path()).sync(source.path(), "", SyncPolicy::Incremental).unwrap();

	assert_eq!(report.copied, vec!["x/y.txt"]);
	assert_eq!(report.deleted, vec!["x"]);
	assert!(report.errors.is_empty());
	assert_eq!(fs::read_to_string(root.path().join("x/y.txt")).unwrap(), "why");

	// Settled: a second run changes nothing
	let again = engine(root.path()).sync(source.path(), "", SyncPolicy::Incremental).unwrap();
	assert!(again.is_noop());
}

#[test]
fn test_replace_all_into_root_resolves_type_changes() {
	let root = TempDir::new().unwrap();
	let source = TempDir::new().unwrap();
	create_file(source.path(), "notes", "file");
	create_file(source.path(), "x/y.txt", "why");
	create_file(root.path(), "notes/old.txt", "old");
	create_file(root.path(), "x", "was a file");

	let report = engine(root.path()).sync(source.path(), "", SyncPolicy::ReplaceAll).unwrap();

	assert_eq!(sorted(report.copied), vec!["notes", "x/y.txt"]);
	assert_eq!(sorted(report.deleted), vec!["notes/", "x"]);
	assert!(root.path().join("notes").is_file());
	assert!(root.path().join("x/y.txt").is_file());
}

#[cfg(target_os = "linux")]
#[test]
fn test_incremental_deletes_non_utf8_names() {
	use std::ffi::OsStr;
	use std::os::unix::ffi::OsStrExt;

	let root = TempDir::new().unwrap();
	let source = TempDir::new().unwrap();
	create_file(source.path(), "a.txt", "a");
	let stale = root.path().join("old").join(OsStr::from_bytes(b"caf\xe9.txt"));
	fs::create_dir_all(stale.parent().unwrap()).unwrap();
	fs::write(&stale, "stale").unwrap();

	let report = engine(root.path()).sync(source.path(), "", SyncPolicy::Incremental).unwrap();

	assert_eq!(report.deleted, vec!["old/caf\u{FFFD}.txt"]);
	assert!(report.errors.is_empty());
	assert!(!stale.exists());
	assert!(!root.path().join("old").exists());
}

#[cfg(target_os = "linux")]
#[test]
fn test_incremental_copies_non_utf8_names() {
	use std::ffi::OsStr;
	use std::os::unix::ffi::OsStrExt;

	let root = TempDir::new().unwrap();
	let source = TempDir::new().unwrap();
	let name = OsStr::from_bytes(b"r\xe9sum\xe9.pdf");
	fs::write(source.path().join(name), "cv").unwrap();

	let engine = engine(root.path());
	let report = engine.sync(source.path(), "", SyncPolicy::Incremental).unwrap();
	assert_eq!(report.copied.len(), 1);
	assert!(root.path().join(name).is_file());

	// The copy is matched by its real name, not the lossy one
	let again = engine.sync(source.path(), "", SyncPolicy::Incremental).unwrap();
	assert!(again.is_noop());
	assert!(root.path().join(name).is_file());
}

// ===================================================================
// REPLACE ALL
// ===================================================================

#[test]
fn test_replace_all_wipes_target_subpath() {
	let root = TempDir::new().unwrap();
	let source = TempDir::new().unwrap();
	create_file(source.path(), "fresh.txt", "fresh");
	create_file(root.path(), "manuals/stale.txt", "stale");
	create_file(root.path(), "manuals/.git/HEAD", "ref");
	create_file(root.path(), "unrelated/keep.txt", "keep");

	let report = engine(root.path()).sync(source.path(), "manuals", SyncPolicy::ReplaceAll).unwrap();

	assert_eq!(report.copied, vec!["fresh.txt"]);
	assert_eq!(report.deleted, vec!["manuals/"]);
	assert!(!root.path().join("manuals/stale.txt").exists());
	// Wholesale removal does not spare excluded entries
	assert!(!root.path().join("manuals/.git").exists());
	assert!(root.path().join("unrelated/keep.txt").exists());
}

#[test]
fn test_replace_all_creates_missing_target() {
	let root = TempDir::new().unwrap();
	let source = TempDir::new().unwrap();
	create_file(source.path(), "a/b/c.txt", "abc");

	let report = engine(root.path()).sync(source.path(), "new/place", SyncPolicy::ReplaceAll).unwrap();

	assert_eq!(report.copied, vec!["a/b/c.txt"]);
	assert!(report.deleted.is_empty());
	assert_eq!(fs::read_to_string(root.path().join("new/place/a/b/c.txt")).unwrap(), "abc");
}

#[test]
fn test_replace_all_never_removes_root() {
	let root = TempDir::new().unwrap();
	let source = TempDir::new().unwrap();
	create_file(source.path(), "a.txt", "a");
	create_file(root.path(), "existing.txt", "e");

	for target in ["", "/", "."] {
		let report = engine(root.path()).sync(source.path(), target, SyncPolicy::ReplaceAll).unwrap();
		assert!(report.deleted.is_empty());
	}

	assert!(root.path().is_dir());
	assert!(root.path().join("existing.txt").exists());
	assert!(root.path().join("a.txt").exists());
}

#[test]
fn test_copy_sizes_match_for_both_policies() {
	let source = TempDir::new().unwrap();
	create_file(source.path(), "one.bin", &"1".repeat(1000));
	create_file(source.path(), "dir/two.bin", &"2".repeat(4096));

	for policy in [SyncPolicy::ReplaceAll, SyncPolicy::Incremental] {
		let root = TempDir::new().unwrap();
		engine(root.path()).sync(source.path(), "out", policy).unwrap();

		for rel in ["one.bin", "dir/two.bin"] {
			let src = fs::metadata(source.path().join(rel)).unwrap().len();
			let dst = fs::metadata(root.path().join("out").join(rel)).unwrap().len();
			assert_eq!(src, dst, "{} under {}", rel, policy);
		}
	}
}

// ===================================================================
// STRUCTURAL ERRORS
// ===================================================================

#[test]
fn test_target_outside_root_rejected() {
	let root = TempDir::new().unwrap();
	let source = TempDir::new().unwrap();
	create_file(source.path(), "a.txt", "a");

	for target in ["../escape", "docs/../../escape", "a/.."] {
		let result = engine(root.path()).sync(source.path(), target, SyncPolicy::ReplaceAll);
		assert!(matches!(result, Err(SyncError::InvalidTarget { .. })), "{}", target);
	}
}

#[cfg(unix)]
#[test]
fn test_replace_all_failed_removal_aborts_before_copy() {
	use std::os::unix::fs::PermissionsExt;

	let root = TempDir::new().unwrap();
	let source = TempDir::new().unwrap();
	create_file(source.path(), "fresh.txt", "fresh");
	create_file(root.path(), "manuals/locked/pinned.txt", "pinned");
	let locked = root.path().join("manuals/locked");
	fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

	// Permission bits do not bind a privileged user
	if fs::write(locked.join("canary"), "").is_ok() {
		fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
		return;
	}

	let result = engine(root.path()).sync(source.path(), "manuals", SyncPolicy::ReplaceAll);
	fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

	match result {
		Err(SyncError::ReplaceFailed { path, .. }) => assert_eq!(path, "manuals"),
		other => panic!("expected ReplaceFailed, got {:?}", other),
	}
	assert!(!root.path().join("manuals/fresh.txt").exists());
	assert!(locked.join("pinned.txt").exists());
}

#[test]
fn test_missing_source_leaves_target_intact() {
	let root = TempDir::new().unwrap();
	create_file(root.path(), "docs/keep.txt", "k");

	let result =
		engine(root.path()).sync(&root.path().join("missing"), "docs", SyncPolicy::ReplaceAll);

	assert!(matches!(result, Err(SyncError::SourceUnreadable { .. })));
	assert!(root.path().join("docs/keep.txt").exists());
}

// ===================================================================
// CONCURRENCY
// ===================================================================

#[test]
fn test_concurrent_syncs_to_same_target() {
	let root = TempDir::new().unwrap();
	let engine = Arc::new(engine(root.path()));

	let sources: Vec<TempDir> = (0..4)
		.map(|i| {
			let dir = TempDir::new().unwrap();
			for j in 0..20 {
				create_file(dir.path(), &format!("f{}.txt", j), &format!("source {}", i));
			}
			dir
		})
		.collect();

	let handles: Vec<_> = sources
		.iter()
		.map(|s| {
			let engine = Arc::clone(&engine);
			let path = s.path().to_path_buf();
			thread::spawn(move || engine.sync(&path, "shared", SyncPolicy::ReplaceAll))
		})
		.collect();

	for h in handles {
		let report = h.join().unwrap().unwrap();
		assert!(report.errors.is_empty());
		assert_eq!(report.copied.len(), 20);
	}

	// Serialized runs never interleave, so one source wins for every file
	let first = fs::read_to_string(root.path().join("shared/f0.txt")).unwrap();
	for j in 0..20 {
		let content = fs::read_to_string(root.path().join(format!("shared/f{}.txt", j))).unwrap();
		assert_eq!(content, first);
	}
}

// vim: ts=4
