//! Lazy directory traversal with exclusion pruning
//!
//! The walker decides per directory whether to descend, so excluded
//! directories are never opened and nothing beneath them is ever yielded.
//! Unreadable subdirectories are treated as empty; only the walk root can
//! fail hard, and only through [`TreeWalker::try_walk`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use crate::exclusion::{EntryKind, ExclusionFilter};
use crate::logging::*;
use crate::types::{DirectorySnapshot, FileInfo};
use crate::validation::to_slash_path;

/// Walks one directory tree through an exclusion filter
#[derive(Debug, Clone, Copy)]
pub struct TreeWalker<'a> {
	root: &'a Path,
	filter: &'a ExclusionFilter,
}

impl<'a> TreeWalker<'a> {
	pub fn new(root: &'a Path, filter: &'a ExclusionFilter) -> Self {
		TreeWalker { root, filter }
	}

	/// Start a fresh walk; an unreadable root yields nothing
	pub fn walk(&self) -> Walk<'a> {
		match self.try_walk() {
			Ok(walk) => walk,
			Err(e) => {
				debug!("Cannot read directory {}: {}", self.root.display(), e);
				Walk { filter: self.filter, stack: Vec::new() }
			}
		}
	}

	/// Start a fresh walk, failing if the root itself cannot be read
	pub fn try_walk(&self) -> io::Result<Walk<'a>> {
		let entries = fs::read_dir(self.root)?;
		Ok(Walk { filter: self.filter, stack: vec![Frame { prefix: PathBuf::new(), entries }] })
	}

	/// Collect a full walk keyed by relative path
	pub fn snapshot(&self) -> DirectorySnapshot {
		self.walk().map(|info| (info.path.clone(), info)).collect()
	}

	/// True when the tree holds no non-excluded file at any depth
	pub fn is_effectively_empty(&self) -> bool {
		self.walk().next().is_none()
	}

	/// Every non-excluded directory below the root, children before parents
	///
	/// The root itself is not included. Paths are relative to the root.
	pub fn walk_dirs(&self) -> Vec<PathBuf> {
		let mut dirs = Vec::new();
		self.collect_dirs(self.root, Path::new(""), &mut dirs);
		dirs
	}

	fn collect_dirs(&self, dir: &Path, prefix: &Path, out: &mut Vec<PathBuf>) {
		let entries = match fs::read_dir(dir) {
			Ok(e) => e,
			Err(e) => {
				debug!("Cannot read directory {}: {}", dir.display(), e);
				return;
			}
		};

		for entry_result in entries {
			let entry = match entry_result {
				Ok(e) => e,
				Err(e) => {
					debug!("Error reading directory entry: {}", e);
					continue;
				}
			};

			let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
			if !is_dir {
				continue;
			}
			let name = entry.file_name();
			if self.filter.is_excluded(&name.to_string_lossy(), EntryKind::Directory) {
				continue;
			}

			let rel = prefix.join(&name);
			self.collect_dirs(&entry.path(), &rel, out);
			out.push(rel);
		}
	}
}

struct Frame {
	prefix: PathBuf,
	entries: fs::ReadDir,
}

/// Lazy depth-first iterator over the files of a tree
///
/// Names that are not valid UTF-8 are walked like any other; only the
/// report form in [`FileInfo::path`] is decoded lossily.
pub struct Walk<'a> {
	filter: &'a ExclusionFilter,
	stack: Vec<Frame>,
}

impl Iterator for Walk<'_> {
	type Item = FileInfo;

	fn next(&mut self) -> Option<FileInfo> {
		loop {
			let frame = self.stack.last_mut()?;
			let entry = match frame.entries.next() {
				None => {
					self.stack.pop();
					continue;
				}
				Some(Err(e)) => {
					debug!("Error reading directory entry: {}", e);
					continue;
				}
				Some(Ok(entry)) => entry,
			};

			let file_name = entry.file_name();
			let name = file_name.to_string_lossy();
			let rel = frame.prefix.join(&file_name);

			let file_type = match entry.file_type() {
				Ok(t) => t,
				Err(e) => {
					warn!("Cannot access {}: {}", rel.display(), e);
					continue;
				}
			};

			if file_type.is_dir() {
				if self.filter.is_excluded(&name, EntryKind::Directory) {
					debug!("Pruning excluded directory {}", rel.display());
					continue;
				}
				match fs::read_dir(entry.path()) {
					Ok(entries) => self.stack.push(Frame { prefix: rel, entries }),
					Err(e) => warn!("Cannot read directory {}: {}", rel.display(), e),
				}
				continue;
			}

			// Symlinks, sockets and devices are not synced or listed
			if !file_type.is_file() {
				continue;
			}
			if self.filter.is_excluded(&name, EntryKind::File) {
				continue;
			}

			let meta = match entry.metadata() {
				Ok(m) => m,
				Err(e) => {
					warn!("Cannot stat {}: {}", rel.display(), e);
					continue;
				}
			};

			return Some(FileInfo {
				path: to_slash_path(&rel),
				relative: rel,
				size: meta.len(),
				modified: meta.modified().unwrap_or(UNIX_EPOCH),
			});
		}
	}
}


// vim: ts=4
