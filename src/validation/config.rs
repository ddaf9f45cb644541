//! Configuration validation functions

use std::path::Path;

use super::ValidationError;

/// Validate the listening port
pub fn validate_port(port: u16) -> Result<(), ValidationError> {
	if port == 0 {
		return Err(ValidationError::ConfigError("Port must be greater than 0".to_string()));
	}
	Ok(())
}

/// Validate the document root setting
///
/// The directory itself may be missing at startup; only an empty setting is
/// rejected.
pub fn validate_docs_root(root: &Path) -> Result<(), ValidationError> {
	if root.as_os_str().is_empty() {
		return Err(ValidationError::ConfigError("Document root must not be empty".to_string()));
	}
	Ok(())
}

/// Validate the upload size limit in megabytes
pub fn validate_upload_limit_mb(limit_mb: usize) -> Result<(), ValidationError> {
	if limit_mb == 0 {
		return Err(ValidationError::ConfigError(
			"Upload limit must be greater than 0".to_string(),
		));
	}
	if limit_mb > 16 * 1024 {
		return Err(ValidationError::ConfigError(format!(
			"Upload limit too large: {} MB (max 16384)",
			limit_mb
		)));
	}
	Ok(())
}
