//! Directory synchronization engine
//!
//! Makes a target directory under the document root match a fully staged
//! source directory. Two policies exist:
//!
//! * [`SyncPolicy::ReplaceAll`]: remove the target sub-path wholesale, then
//!   copy every source file.
//! * [`SyncPolicy::Incremental`]: copy missing or changed files, delete files
//!   the source no longer has, then prune directories left empty.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docsync::exclusion::ExclusionFilter;
//! use docsync::strategies::SyncPolicy;
//! use docsync::sync::SyncEngine;
//!
//! let filter = Arc::new(ExclusionFilter::with_defaults()?);
//! let engine = SyncEngine::new("/config/docs", filter);
//! let report = engine.sync("/tmp/upload".as_ref(), "reports", SyncPolicy::Incremental)?;
//! if report.has_errors() {
//!     eprintln!("partial sync: {:?}", report.errors);
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::UNIX_EPOCH;

use filetime::FileTime;

use crate::delete::DeleteHandler;
use crate::error::SyncError;
use crate::exclusion::ExclusionFilter;
use crate::logging::*;
use crate::strategies::SyncPolicy;
use crate::types::{FileInfo, OperationReport};
use crate::utils::lock::PathLocks;
use crate::validation::{self, to_slash_path};
use crate::walker::{TreeWalker, Walk};

/// Sync engine bound to one document root
///
/// Holds no state between calls apart from the table of targets currently
/// being synced, which serializes overlapping calls.
#[derive(Debug)]
pub struct SyncEngine {
	root: PathBuf,
	filter: Arc<ExclusionFilter>,
	locks: PathLocks,
}

impl SyncEngine {
	pub fn new(root: impl Into<PathBuf>, filter: Arc<ExclusionFilter>) -> Self {
		SyncEngine { root: root.into(), filter, locks: PathLocks::new() }
	}

	/// Document root every target path is resolved against
	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Make `target` (relative to the document root, empty for the root) match `source`
	///
	/// Fails outright only on structural problems: unreadable source, invalid
	/// target path, failed wholesale removal or target creation. Per-file
	/// failures land in the returned report.
	pub fn sync(
		&self,
		source: &Path,
		target: &str,
		policy: SyncPolicy,
	) -> Result<OperationReport, SyncError> {
		let relative = validation::normalize_relative(target)?;
		let target_dir = self.root.join(&relative);
		validation::validate_path_within_root(&target_dir, &self.root)?;

		let source_walk = TreeWalker::new(source, &self.filter).try_walk().map_err(|e| {
			SyncError::SourceUnreadable { path: source.display().to_string(), source: e }
		})?;

		let _guard = self.locks.lock(&relative)?;
		info!(
			"Syncing {} into {} ({})",
			source.display(),
			target_dir.display(),
			policy
		);

		let report = match policy {
			SyncPolicy::ReplaceAll => self.replace_all(source_walk, source, &relative, &target_dir)?,
			SyncPolicy::Incremental => self.incremental(source_walk, source, &target_dir)?,
		};

		if report.has_errors() {
			warn!("Sync into {} finished with errors: {}", target_dir.display(), report.summary());
		} else {
			info!("Sync into {} finished: {}", target_dir.display(), report.summary());
		}
		Ok(report)
	}

	fn replace_all(
		&self,
		source_walk: Walk<'_>,
		source: &Path,
		relative: &Path,
		target_dir: &Path,
	) -> Result<OperationReport, SyncError> {
		let mut report = OperationReport::new();

		// The document root is never removed, only written into
		let is_root = relative.as_os_str().is_empty();
		if !is_root && fs::symlink_metadata(target_dir).is_ok() {
			fs::remove_dir_all(target_dir).map_err(|e| SyncError::ReplaceFailed {
				path: validation::to_slash_path(relative),
				source: e,
			})?;
			let removed = format!("{}/", validation::to_slash_path(relative));
			info!("Removed existing directory {}", removed);
			report.record_delete(removed);
		}

		ensure_dir(target_dir)?;

		for info in source_walk {
			self.copy_into(source, target_dir, &info, &mut report);
		}

		Ok(report)
	}

	fn incremental(
		&self,
		source_walk: Walk<'_>,
		source: &Path,
		target_dir: &Path,
	) -> Result<OperationReport, SyncError> {
		let mut report = OperationReport::new();
		ensure_dir(target_dir)?;

		// Copy pass
		let mut source_paths = HashSet::new();
		for info in source_walk {
			if should_copy(&info, &target_dir.join(&info.relative)) {
				self.copy_into(source, target_dir, &info, &mut report);
			} else {
				report.record_unchanged();
			}
			source_paths.insert(info.relative);
		}

		// Delete pass, then prune pass
		let handler = DeleteHandler::new(target_dir, &self.filter);
		handler.delete_stale(&source_paths, &mut report);
		let pruned = handler.prune_empty_dirs();
		if !pruned.is_empty() {
			debug!("Pruned {} empty directories", pruned.len());
		}

		Ok(report)
	}

	fn copy_into(
		&self,
		source: &Path,
		target_dir: &Path,
		info: &FileInfo,
		report: &mut OperationReport,
	) {
		if let Err(e) = clear_type_conflicts(target_dir, &info.relative, report) {
			warn!("Cannot make room for {}: {}", info.path, e);
			report.record_error(format!("Failed to copy {}: {}", info.path, e));
			return;
		}

		let from = source.join(&info.relative);
		let to = target_dir.join(&info.relative);
		match copy_file(&from, &to) {
			Ok(bytes) => {
				debug!("Copied {} ({} bytes)", info.path, bytes);
				report.record_copy(info.path.clone());
			}
			Err(e) => {
				warn!("Failed to copy {}: {}", info.path, e);
				report.record_error(format!("Failed to copy {}: {}", info.path, e));
			}
		}
	}
}

/// Decide whether a source file must be copied over `destination`
///
/// Copies when the destination is missing, differs in size, or is strictly
/// older than the source. Content is never compared.
pub fn should_copy(source: &FileInfo, destination: &Path) -> bool {
	let meta = match fs::metadata(destination) {
		Ok(m) => m,
		Err(_) => return true,
	};

	if !meta.is_file() || meta.len() != source.size {
		return true;
	}

	let target_modified = meta.modified().unwrap_or(UNIX_EPOCH);
	source.modified > target_modified
}

/// Remove target entries standing in the way of a file at `relative`
///
/// A directory where the source has a file, and a non-directory where the
/// source has a directory, are removed and recorded as deleted. A symlink at
/// the file's own location is unlinked so the copy never writes through it.
fn clear_type_conflicts(
	target_dir: &Path,
	relative: &Path,
	report: &mut OperationReport,
) -> io::Result<()> {
	let mut current = PathBuf::new();
	let mut components = relative.components().peekable();

	while let Some(component) = components.next() {
		current.push(component);
		let path = target_dir.join(&current);
		let meta = match fs::symlink_metadata(&path) {
			Ok(m) => m,
			Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
			Err(e) => return Err(e),
		};

		if components.peek().is_some() {
			if !meta.is_dir() {
				fs::remove_file(&path)?;
				let removed = to_slash_path(&current);
				info!("Removed {} to make room for a directory", removed);
				report.record_delete(removed);
				return Ok(());
			}
		} else if meta.is_dir() {
			fs::remove_dir_all(&path)?;
			let removed = format!("{}/", to_slash_path(&current));
			info!("Removed directory {} to make room for a file", removed);
			report.record_delete(removed);
		} else if meta.file_type().is_symlink() {
			fs::remove_file(&path)?;
		}
	}

	Ok(())
}

/// Copy one file, creating parent directories and carrying over the mtime
pub fn copy_file(from: &Path, to: &Path) -> io::Result<u64> {
	if let Some(parent) = to.parent() {
		fs::create_dir_all(parent)?;
	}
	let bytes = fs::copy(from, to)?;
	let meta = fs::metadata(from)?;
	filetime::set_file_mtime(to, FileTime::from_last_modification_time(&meta))?;
	Ok(bytes)
}

fn ensure_dir(dir: &Path) -> Result<(), SyncError> {
	fs::create_dir_all(dir).map_err(|e| SyncError::TargetUnavailable {
		path: dir.display().to_string(),
		source: e,
	})
}


// vim: ts=4
