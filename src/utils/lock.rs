//! Per-target advisory locks for sync calls
//!
//! Two syncs whose target paths overlap (equal, or one inside the other) are
//! serialized; syncs to disjoint subtrees run concurrently. The root path
//! overlaps everything.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use crate::error::SyncError;
use crate::logging::*;

/// Table of target paths currently being synced
#[derive(Debug, Default)]
pub struct PathLocks {
	held: Mutex<HashSet<PathBuf>>,
	released: Condvar,
}

/// Held for the duration of one sync; releases the path on drop
#[derive(Debug)]
pub struct PathGuard<'a> {
	locks: &'a PathLocks,
	key: PathBuf,
}

impl PathLocks {
	pub fn new() -> Self {
		Self::default()
	}

	/// Block until no overlapping path is held, then take `key`
	pub fn lock(&self, key: &Path) -> Result<PathGuard<'_>, SyncError> {
		let mut held = self.held.lock().map_err(|e| SyncError::LockFailed {
			message: format!("path lock table poisoned: {}", e),
		})?;

		while held.iter().any(|h| overlaps(h, key)) {
			debug!("Waiting for concurrent sync on {:?}", key);
			held = self.released.wait(held).map_err(|e| SyncError::LockFailed {
				message: format!("path lock table poisoned: {}", e),
			})?;
		}

		held.insert(key.to_path_buf());
		Ok(PathGuard { locks: self, key: key.to_path_buf() })
	}

	/// Take `key` only if nothing overlapping is held
	#[cfg(test)]
	fn try_lock(&self, key: &Path) -> Option<PathGuard<'_>> {
		let mut held = self.held.lock().ok()?;
		if held.iter().any(|h| overlaps(h, key)) {
			return None;
		}
		held.insert(key.to_path_buf());
		Some(PathGuard { locks: self, key: key.to_path_buf() })
	}

	fn table(&self) -> MutexGuard<'_, HashSet<PathBuf>> {
		// The set stays consistent even if a holder panicked
		self.held.lock().unwrap_or_else(PoisonError::into_inner)
	}
}

impl Drop for PathGuard<'_> {
	fn drop(&mut self) {
		self.locks.table().remove(&self.key);
		self.locks.released.notify_all();
	}
}

fn overlaps(a: &Path, b: &Path) -> bool {
	a.starts_with(b) || b.starts_with(a)
}


// vim: ts=4
