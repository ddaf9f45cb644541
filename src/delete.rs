//! Deletion and pruning passes of an incremental sync
//!
//! Both passes see the target through the same exclusion filter as the copy
//! pass, so excluded files and everything under excluded directories are never
//! touched. Failures are recorded per item and never stop the pass.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::exclusion::ExclusionFilter;
use crate::logging::*;
use crate::types::{FileInfo, OperationReport};
use crate::validation::to_slash_path;
use crate::walker::TreeWalker;

/// Removes stale files and empty directories below one target directory
pub struct DeleteHandler<'a> {
	target: &'a Path,
	filter: &'a ExclusionFilter,
}

impl<'a> DeleteHandler<'a> {
	pub fn new(target: &'a Path, filter: &'a ExclusionFilter) -> Self {
		DeleteHandler { target, filter }
	}

	/// Target files whose relative path is not in `keep`
	///
	/// Collected up front so removal never races the directory iteration.
	pub fn stale_files(&self, keep: &HashSet<PathBuf>) -> Vec<FileInfo> {
		TreeWalker::new(self.target, self.filter)
			.walk()
			.filter(|info| !keep.contains(&info.relative))
			.collect()
	}

	/// Delete every stale file, recording each outcome in `report`
	pub fn delete_stale(&self, keep: &HashSet<PathBuf>, report: &mut OperationReport) {
		for info in self.stale_files(keep) {
			match fs::remove_file(self.target.join(&info.relative)) {
				Ok(()) => {
					debug!("Deleted {}", info.path);
					report.record_delete(info.path);
				}
				// Already gone counts as done
				Err(e) if e.kind() == io::ErrorKind::NotFound => {
					debug!("File already removed: {}", info.path);
					report.record_delete(info.path);
				}
				Err(e) => {
					warn!("Failed to delete {}: {}", info.path, e);
					report.record_error(format!("Failed to delete {}: {}", info.path, e));
				}
			}
		}
	}

	/// Remove directories left empty, deepest first
	///
	/// The target directory itself is kept. A directory that still has any
	/// entry (including excluded ones) or cannot be removed stays silently.
	/// Returns the slash-separated relative paths that were removed.
	pub fn prune_empty_dirs(&self) -> Vec<String> {
		let mut pruned = Vec::new();

		for rel in TreeWalker::new(self.target, self.filter).walk_dirs() {
			if fs::remove_dir(self.target.join(&rel)).is_ok() {
				let rel = to_slash_path(&rel);
				debug!("Pruned empty directory {}", rel);
				pruned.push(rel);
			}
		}

		pruned
	}
}


// vim: ts=4
