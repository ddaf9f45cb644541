//! One-level folder browsing

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ListError;
use crate::exclusion::{EntryKind, ExclusionFilter};
use crate::logging::*;
use crate::validation;
use crate::walker::TreeWalker;

/// Immediate contents of one folder, as served by `GET /api/folder/{path}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderListing {
	/// Normalized request path, `.` for the document root
	pub path: String,
	/// Visible, non-empty subfolders, sorted
	pub folders: Vec<String>,
	/// Visible files, sorted
	pub files: Vec<String>,
}

/// Lists folders under a document root through an exclusion filter
#[derive(Debug, Clone, Copy)]
pub struct DirectoryLister<'a> {
	root: &'a Path,
	filter: &'a ExclusionFilter,
}

impl<'a> DirectoryLister<'a> {
	pub fn new(root: &'a Path, filter: &'a ExclusionFilter) -> Self {
		DirectoryLister { root, filter }
	}

	/// List the folder at `path` (relative to the root, empty for the root)
	///
	/// Subfolders that are excluded, or hold no visible file at any depth,
	/// are left out. A child that cannot be inspected is treated as absent.
	pub fn list(&self, path: &str) -> Result<FolderListing, ListError> {
		let relative = validation::normalize_relative(path)?;
		let dir = self.root.join(&relative);

		let entries = match fs::read_dir(&dir) {
			Ok(e) => e,
			Err(e) => {
				debug!("Cannot list {}: {}", dir.display(), e);
				return Err(ListError::NotFound { path: path.to_string() });
			}
		};

		let mut folders = Vec::new();
		let mut files = Vec::new();

		for entry_result in entries {
			let entry = match entry_result {
				Ok(e) => e,
				Err(e) => {
					debug!("Error reading directory entry: {}", e);
					continue;
				}
			};

			let name = match entry.file_name().into_string() {
				Ok(n) => n,
				Err(raw) => {
					warn!("Skipping entry with non UTF-8 name {:?}", raw);
					continue;
				}
			};

			// Follows symlinks; a broken link fails here and is skipped
			let meta = match fs::metadata(entry.path()) {
				Ok(m) => m,
				Err(e) => {
					debug!("Cannot access {}: {}", name, e);
					continue;
				}
			};

			if meta.is_dir() {
				if self.filter.is_excluded(&name, EntryKind::Directory) {
					continue;
				}
				if TreeWalker::new(&entry.path(), self.filter).is_effectively_empty() {
					continue;
				}
				folders.push(name);
			} else if meta.is_file() {
				if self.filter.is_excluded(&name, EntryKind::File) {
					continue;
				}
				files.push(name);
			}
		}

		folders.sort();
		files.sort();

		let normalized = validation::to_slash_path(&relative);
		let path = if normalized.is_empty() { ".".to_string() } else { normalized };
		Ok(FolderListing { path, folders, files })
	}
}


// vim: ts=4
