//! Configuration for the docsync service
//!
//! The configuration follows a priority chain:
//! 1. Built-in defaults (Config::default())
//! 2. Config file (`.toml`, `.json` or `.json5`, picked by extension)
//! 3. Environment variables (DOCSYNC_* prefix)
//! 4. CLI flags (highest priority, applied by the binary)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::exclusion::{ExcludeConfig, ExclusionFilter};
use crate::strategies::SyncPolicy;
use crate::validation;

/// Document root of the deployed add-on
pub const DEFAULT_DOCS_ROOT: &str = "/config/docs";

/// Static UI bundle location of the deployed add-on
pub const DEFAULT_UI_DIR: &str = "/html/ux";

// ============================================================================
// MAIN CONFIGURATION STRUCT
// ============================================================================

/// Service configuration, fixed for the lifetime of the process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
	// ========================================================================
	// FILESYSTEM
	// ========================================================================
	/// Directory served and synchronized by the service
	pub docs_root: PathBuf,

	/// Directory holding `index.html` and the UI assets
	pub ui_dir: PathBuf,

	// ========================================================================
	// HTTP
	// ========================================================================
	/// Address to bind
	pub host: String,

	/// Port to bind
	pub port: u16,

	/// Largest accepted upload body in megabytes
	pub max_upload_mb: usize,

	// ========================================================================
	// SYNC BEHAVIOR
	// ========================================================================
	/// Policy used when an upload does not name one
	pub default_policy: SyncPolicy,

	/// File names hidden from listings and exempt from copy and delete
	pub exclude_files: Vec<String>,

	/// Directory names hidden from listings and never descended into
	pub exclude_folders: Vec<String>,

	// ========================================================================
	// OUTPUT & LOGGING
	// ========================================================================
	/// Log level used when RUST_LOG is not set
	pub log_level: String,
}

impl Default for Config {
	fn default() -> Self {
		let excludes = ExcludeConfig::default();
		Config {
			docs_root: PathBuf::from(DEFAULT_DOCS_ROOT),
			ui_dir: PathBuf::from(DEFAULT_UI_DIR),
			host: "0.0.0.0".to_string(),
			port: 8000,
			max_upload_mb: 512,
			default_policy: SyncPolicy::ReplaceAll,
			exclude_files: excludes.files,
			exclude_folders: excludes.folders,
			log_level: "info".to_string(),
		}
	}
}

impl Config {
	/// Load a config file on top of the defaults
	pub fn load_from_file(path: &Path) -> Result<Config, ConfigError> {
		let display = path.display().to_string();
		let content = fs::read_to_string(path)
			.map_err(|e| ConfigError::ReadFailed { path: display.clone(), source: e })?;

		let extension = path.extension().and_then(|e| e.to_str()).map(|e| e.to_lowercase());
		match extension.as_deref() {
			Some("toml") => toml::from_str(&content)
				.map_err(|e| ConfigError::ParseFailed { path: display, message: e.to_string() }),
			Some("json") | Some("json5") => json5::from_str(&content)
				.map_err(|e| ConfigError::ParseFailed { path: display, message: e.to_string() }),
			_ => Err(ConfigError::UnsupportedFormat { path: display }),
		}
	}

	/// Defaults, optionally overlaid by a file, then by the environment
	pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
		let mut config = match path {
			Some(p) => Self::load_from_file(p)?,
			None => Config::default(),
		};
		config.apply_env_vars(|key| std::env::var(key).ok())?;
		Ok(config)
	}

	/// Apply DOCSYNC_* overrides using the given variable lookup
	pub fn apply_env_vars<F>(&mut self, lookup: F) -> Result<(), ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		if let Some(root) = lookup("DOCSYNC_DOCS_ROOT") {
			self.docs_root = PathBuf::from(root);
		}
		if let Some(ui) = lookup("DOCSYNC_UI_DIR") {
			self.ui_dir = PathBuf::from(ui);
		}
		if let Some(host) = lookup("DOCSYNC_HOST") {
			self.host = host;
		}
		if let Some(port) = lookup("DOCSYNC_PORT") {
			self.port = port.parse().map_err(|e| ConfigError::Invalid {
				message: format!("DOCSYNC_PORT {:?}: {}", port, e),
			})?;
		}
		if let Some(policy) = lookup("DOCSYNC_DEFAULT_POLICY") {
			self.default_policy =
				policy.parse().map_err(|message| ConfigError::Invalid { message })?;
		}
		Ok(())
	}

	/// Check values and compile the exclusion lists once
	pub fn validate(&self) -> Result<(), ConfigError> {
		validation::validate_port(self.port)?;
		validation::validate_docs_root(&self.docs_root)?;
		validation::validate_upload_limit_mb(self.max_upload_mb)?;
		self.exclusion_filter()?;
		Ok(())
	}

	pub fn exclude_config(&self) -> ExcludeConfig {
		ExcludeConfig { files: self.exclude_files.clone(), folders: self.exclude_folders.clone() }
	}

	/// Compile the configured exclusion lists
	pub fn exclusion_filter(&self) -> Result<ExclusionFilter, ConfigError> {
		Ok(ExclusionFilter::new(&self.exclude_config())?)
	}

	/// `host:port` string for binding
	pub fn bind_addr(&self) -> String {
		format!("{}:{}", self.host, self.port)
	}

	pub fn max_upload_bytes(&self) -> usize {
		self.max_upload_mb.saturating_mul(1024 * 1024)
	}
}


// vim: ts=4
