//! Sync policy selection
//!
//! Parsed from the CLI, the config file and the upload form, so it carries
//! `FromStr`, `Display` and serde support.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// SYNC POLICY
// ============================================================================

/// How an uploaded tree replaces the target directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SyncPolicy {
	/// Remove the target sub-path wholesale, then copy everything (default)
	#[default]
	ReplaceAll,

	/// Copy new and changed files, delete stale ones, prune empty directories
	Incremental,
}

impl FromStr for SyncPolicy {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_lowercase().as_str() {
			"replace-all" | "replaceall" | "replace" => Ok(Self::ReplaceAll),
			"incremental" | "sync" => Ok(Self::Incremental),
			_ => Err(format!(
				"Unknown sync policy: {}. Valid options: replace-all, incremental",
				s
			)),
		}
	}
}

impl std::fmt::Display for SyncPolicy {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::ReplaceAll => write!(f, "replace-all"),
			Self::Incremental => write!(f, "incremental"),
		}
	}
}


// vim: ts=4
