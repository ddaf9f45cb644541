//! Upload staging
//!
//! Materializes uploaded file parts into a private temporary directory so the
//! sync engine only ever sees a complete, real source tree. The directory is
//! removed when the [`Stager`] is dropped.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use crate::error::StagingError;
use crate::logging::*;

/// Temporary holding area for one upload
#[derive(Debug)]
pub struct Stager {
	dir: TempDir,
	staged: Vec<String>,
}

impl Stager {
	/// Create a fresh, empty staging directory under the system temp dir
	pub fn new() -> Result<Self, StagingError> {
		let dir = tempfile::Builder::new()
			.prefix("docsync-upload-")
			.tempdir()
			.map_err(StagingError::TempDir)?;
		debug!("Staging upload in {}", dir.path().display());
		Ok(Stager { dir, staged: Vec::new() })
	}

	/// Write one uploaded part at the relative path carried by its file name
	///
	/// Returns the sanitized relative path. A later part with the same name
	/// overwrites the earlier one.
	pub fn stage(&mut self, name: &str, contents: &[u8]) -> Result<String, StagingError> {
		let relative = sanitize_upload_name(name)?;
		let path = self.dir.path().join(&relative);

		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent).map_err(|e| StagingError::WriteFailed {
				name: relative.clone(),
				source: e,
			})?;
		}
		fs::write(&path, contents)
			.map_err(|e| StagingError::WriteFailed { name: relative.clone(), source: e })?;

		if !self.staged.contains(&relative) {
			self.staged.push(relative.clone());
		}
		Ok(relative)
	}

	/// Root of the staged tree, to hand to the sync engine
	pub fn path(&self) -> &Path {
		self.dir.path()
	}

	/// Relative paths staged so far, in arrival order
	pub fn staged(&self) -> &[String] {
		&self.staged
	}
}

/// Turn an upload file name into a safe slash-separated relative path
///
/// Backslashes count as separators, leading separators and `.` components are
/// dropped, and names that are empty or contain `..` are rejected.
pub fn sanitize_upload_name(name: &str) -> Result<String, StagingError> {
	let mut parts = Vec::new();

	for part in name.split(|c: char| c == '/' || c == '\\') {
		match part {
			"" | "." => continue,
			".." => return Err(StagingError::InvalidName { name: name.to_string() }),
			_ if part.contains(':') && parts.is_empty() => {
				// Drive prefix such as `C:`
				return Err(StagingError::InvalidName { name: name.to_string() });
			}
			_ => parts.push(part),
		}
	}

	if parts.is_empty() {
		return Err(StagingError::InvalidName { name: name.to_string() });
	}
	Ok(parts.join("/"))
}


// vim: ts=4
