//! Error types for docsync operations

use std::error::Error;
use std::fmt;
use std::io;

use crate::exclusion::ExclusionError;
use crate::validation::ValidationError;

/// Structural failure of a sync call.
///
/// Per-file problems never show up here; they are collected in
/// [`OperationReport::errors`](crate::types::OperationReport) instead.
#[derive(Debug)]
pub enum SyncError {
	/// Source directory is missing or cannot be read at the top level
	SourceUnreadable { path: String, source: io::Error },

	/// Target path is absolute, escapes the document root, or is otherwise invalid
	InvalidTarget { message: String },

	/// Wholesale removal of the existing target failed (ReplaceAll)
	ReplaceFailed { path: String, source: io::Error },

	/// Target directory could not be created
	TargetUnavailable { path: String, source: io::Error },

	/// Lock acquisition failed
	LockFailed { message: String },
}

impl fmt::Display for SyncError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SyncError::SourceUnreadable { path, source } => {
				write!(f, "Source directory {} is not readable: {}", path, source)
			}
			SyncError::InvalidTarget { message } => write!(f, "Invalid target path: {}", message),
			SyncError::ReplaceFailed { path, source } => {
				write!(f, "Failed to remove existing directory {}: {}", path, source)
			}
			SyncError::TargetUnavailable { path, source } => {
				write!(f, "Cannot create target directory {}: {}", path, source)
			}
			SyncError::LockFailed { message } => {
				write!(f, "Lock acquisition failed: {}", message)
			}
		}
	}
}

impl Error for SyncError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			SyncError::SourceUnreadable { source, .. }
			| SyncError::ReplaceFailed { source, .. }
			| SyncError::TargetUnavailable { source, .. } => Some(source),
			_ => None,
		}
	}
}

impl From<ValidationError> for SyncError {
	fn from(e: ValidationError) -> Self {
		SyncError::InvalidTarget { message: e.to_string() }
	}
}

/// Folder listing errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListError {
	/// Path does not resolve to a readable directory
	NotFound { path: String },

	/// Path escapes the document root
	InvalidPath { message: String },
}

impl fmt::Display for ListError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ListError::NotFound { path } => write!(f, "Folder not found: {}", path),
			ListError::InvalidPath { message } => write!(f, "Invalid path: {}", message),
		}
	}
}

impl Error for ListError {}

impl From<ValidationError> for ListError {
	fn from(e: ValidationError) -> Self {
		ListError::InvalidPath { message: e.to_string() }
	}
}

/// Upload staging errors
#[derive(Debug)]
pub enum StagingError {
	/// Temporary holding directory could not be created
	TempDir(io::Error),

	/// Part name is empty or tries to leave the staging directory
	InvalidName { name: String },

	/// Writing a staged part failed
	WriteFailed { name: String, source: io::Error },
}

impl fmt::Display for StagingError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			StagingError::TempDir(e) => write!(f, "Cannot create staging directory: {}", e),
			StagingError::InvalidName { name } => write!(f, "Invalid upload file name: {:?}", name),
			StagingError::WriteFailed { name, source } => {
				write!(f, "Failed to stage {}: {}", name, source)
			}
		}
	}
}

impl Error for StagingError {}

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigError {
	/// Config file could not be read
	ReadFailed { path: String, source: io::Error },

	/// Config file content is malformed
	ParseFailed { path: String, message: String },

	/// Extension is neither toml nor json/json5
	UnsupportedFormat { path: String },

	/// Values parsed but failed validation
	Invalid { message: String },
}

impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ConfigError::ReadFailed { path, source } => {
				write!(f, "Cannot read config file {}: {}", path, source)
			}
			ConfigError::ParseFailed { path, message } => {
				write!(f, "Cannot parse config file {}: {}", path, message)
			}
			ConfigError::UnsupportedFormat { path } => {
				write!(f, "Unsupported config format (expected .toml, .json or .json5): {}", path)
			}
			ConfigError::Invalid { message } => write!(f, "Invalid configuration: {}", message),
		}
	}
}

impl Error for ConfigError {}

impl From<ValidationError> for ConfigError {
	fn from(e: ValidationError) -> Self {
		ConfigError::Invalid { message: e.to_string() }
	}
}

impl From<ExclusionError> for ConfigError {
	fn from(e: ExclusionError) -> Self {
		ConfigError::Invalid { message: e.to_string() }
	}
}


// vim: ts=4
