//! Utility modules for common functionality

pub mod lock;
pub mod signal;

// Re-export commonly used items
pub use lock::{PathGuard, PathLocks};
pub use signal::shutdown_signal;

// vim: ts=4
