use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::SystemTime;

/// Stat data for one regular file found by a tree walk
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FileInfo {
	/// Path relative to the walk root, exactly as stored on disk
	pub relative: PathBuf,
	/// Slash-separated, lossily decoded form of `relative` for reports
	pub path: String,
	pub size: u64,
	pub modified: SystemTime,
}

/// Every non-excluded file of a tree, keyed by relative path
pub type DirectorySnapshot = BTreeMap<String, FileInfo>;

/// Outcome of one sync call
///
/// Entries are only ever appended. A failed copy or delete adds a message to
/// `errors` and the run goes on, so a successful call can still carry errors.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct OperationReport {
	pub copied: Vec<String>,
	pub deleted: Vec<String>,
	pub errors: Vec<String>,
	/// Files found up to date and left alone
	#[serde(skip)]
	pub unchanged: usize,
}

impl OperationReport {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn record_copy(&mut self, path: impl Into<String>) {
		self.copied.push(path.into());
	}

	pub fn record_delete(&mut self, path: impl Into<String>) {
		self.deleted.push(path.into());
	}

	pub fn record_error(&mut self, message: impl Into<String>) {
		self.errors.push(message.into());
	}

	pub fn record_unchanged(&mut self) {
		self.unchanged += 1;
	}

	pub fn has_errors(&self) -> bool {
		!self.errors.is_empty()
	}

	/// True when nothing was copied or deleted
	pub fn is_noop(&self) -> bool {
		self.copied.is_empty() && self.deleted.is_empty()
	}

	/// One-line human summary
	pub fn summary(&self) -> String {
		format!(
			"{} copied, {} deleted, {} unchanged, {} errors",
			self.copied.len(),
			self.deleted.len(),
			self.unchanged,
			self.errors.len()
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_report_records_in_order() {
		let mut report = OperationReport::new();
		report.record_copy("b.txt");
		report.record_copy("a.txt");
		report.record_error("Failed to copy c.txt: denied");
		report.record_delete("old.txt");

		assert_eq!(report.copied, vec!["b.txt", "a.txt"]);
		assert_eq!(report.deleted, vec!["old.txt"]);
		assert!(report.has_errors());
		assert!(!report.is_noop());
	}

	#[test]
	fn test_report_noop() {
		let mut report = OperationReport::new();
		report.record_unchanged();
		assert!(report.is_noop());
		assert_eq!(report.summary(), "0 copied, 0 deleted, 1 unchanged, 0 errors");
	}

	#[test]
	fn test_report_json_shape() {
		let mut report = OperationReport::new();
		report.record_copy("sub/b.txt");
		report.record_unchanged();

		let json = serde_json::to_value(&report).unwrap();
		assert_eq!(json["copied"][0], "sub/b.txt");
		assert!(json["deleted"].as_array().unwrap().is_empty());
		assert!(json["errors"].as_array().unwrap().is_empty());
		assert!(json.get("unchanged").is_none());
	}
}

// vim: ts=4
