//! Exclusion system
//!
//! Decides which file and directory names are hidden from listings and
//! exempt from copy and delete. Two pattern sets exist, one for file names and
//! one for directory names; both are compiled once and never change afterwards.

mod patterns;

pub use patterns::PatternMatcher;

use serde::{Deserialize, Serialize};

/// File names excluded by default
pub const DEFAULT_EXCLUDE_FILES: &[&str] = &[".DS_Store"];

/// Directory names excluded by default
pub const DEFAULT_EXCLUDE_FOLDERS: &[&str] =
	&["__pycache__", ".venv", ".git", ".*cache", "$RECYCLE.BIN"];

/// Kind of directory entry a name belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
	File,
	Directory,
}

/// Exclusion pattern lists as they appear in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExcludeConfig {
	pub files: Vec<String>,
	pub folders: Vec<String>,
}

impl Default for ExcludeConfig {
	fn default() -> Self {
		Self {
			files: DEFAULT_EXCLUDE_FILES.iter().map(|s| s.to_string()).collect(),
			folders: DEFAULT_EXCLUDE_FOLDERS.iter().map(|s| s.to_string()).collect(),
		}
	}
}

impl ExcludeConfig {
	/// Configuration that excludes nothing
	pub fn empty() -> Self {
		Self { files: vec![], folders: vec![] }
	}
}

/// Read-only exclusion filter shared by the walker, lister and sync engine
#[derive(Debug, Clone)]
pub struct ExclusionFilter {
	files: PatternMatcher,
	folders: PatternMatcher,
}

impl ExclusionFilter {
	/// Compile both pattern sets
	pub fn new(config: &ExcludeConfig) -> Result<Self, ExclusionError> {
		Ok(Self {
			files: PatternMatcher::new(&config.files)?,
			folders: PatternMatcher::new(&config.folders)?,
		})
	}

	/// Filter built from the default lists
	pub fn with_defaults() -> Result<Self, ExclusionError> {
		Self::new(&ExcludeConfig::default())
	}

	/// Check a base name against the pattern set for its kind
	pub fn is_excluded(&self, name: &str, kind: EntryKind) -> bool {
		match kind {
			EntryKind::File => self.files.is_match(name),
			EntryKind::Directory => self.folders.is_match(name),
		}
	}

	pub fn is_excluded_file(&self, name: &str) -> bool {
		self.is_excluded(name, EntryKind::File)
	}

	pub fn is_excluded_dir(&self, name: &str) -> bool {
		self.is_excluded(name, EntryKind::Directory)
	}
}

/// Errors that can occur while compiling exclusion patterns
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionError {
	/// Failed to parse a wildcard pattern
	InvalidPattern(String),
}

impl std::fmt::Display for ExclusionError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ExclusionError::InvalidPattern(msg) => {
				write!(f, "Invalid exclusion pattern: {}", msg)
			}
		}
	}
}

impl std::error::Error for ExclusionError {}


// vim: ts=4
