//! Path validation functions

use std::path::{Component, Path, PathBuf};

use super::ValidationError;

/// Check if path is within a root directory
///
/// Purely lexical: compares path components and touches no filesystem. `..`
/// is not resolved and symlinks are not followed, so a symlink inside the root
/// can still point outside it. Feed it paths built from
/// [`normalize_relative`] output.
pub fn is_path_within_root(path: &Path, root: &Path) -> bool {
	path.starts_with(root)
}

/// Validate that path is within root directory
pub fn validate_path_within_root(path: &Path, root: &Path) -> Result<(), ValidationError> {
	if !is_path_within_root(path, root) {
		return Err(ValidationError::PathError(format!(
			"Path {:?} is outside root directory {:?}",
			path, root
		)));
	}
	Ok(())
}

/// Normalize a request path into a root-relative path
///
/// Leading separators are dropped (request paths arrive as `/a/b`), `.` and
/// empty components vanish, and `..` is rejected outright rather than
/// resolved. An empty result denotes the root itself.
///
/// # Examples
/// * `""` and `"/"` -> `""`
/// * `"./reports//2024/"` -> `"reports/2024"`
/// * `"a/../b"` -> error
pub fn normalize_relative(path: &str) -> Result<PathBuf, ValidationError> {
	let mut normalized = PathBuf::new();

	for component in Path::new(path).components() {
		match component {
			Component::Normal(part) => normalized.push(part),
			Component::CurDir | Component::RootDir => {}
			Component::ParentDir => {
				return Err(ValidationError::PathError(format!(
					"Path {:?} contains parent directory reference (..)",
					path
				)));
			}
			Component::Prefix(_) => {
				return Err(ValidationError::PathError(format!(
					"Path {:?} carries a drive prefix",
					path
				)));
			}
		}
	}

	Ok(normalized)
}

/// Resolve a request path under `root`
pub fn resolve_under_root(root: &Path, path: &str) -> Result<PathBuf, ValidationError> {
	let relative = normalize_relative(path)?;
	let resolved = root.join(relative);
	validate_path_within_root(&resolved, root)?;
	Ok(resolved)
}

/// Render a relative path with `/` separators
pub fn to_slash_path(path: &Path) -> String {
	path.components()
		.filter_map(|c| match c {
			Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
			_ => None,
		})
		.collect::<Vec<_>>()
		.join("/")
}
