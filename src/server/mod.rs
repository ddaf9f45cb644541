//! HTTP surface of the document add-on
//!
//! Routes:
//! - `GET /api/health` - liveness check
//! - `GET /api/folder/*path` - one-level folder listing
//! - `GET /api/file/*path` - raw file download
//! - `POST /api/upload` - multipart upload synced into the document root
//! - `GET /` and `GET /ui/*path` - the bundled browser UI

mod api;
mod static_files;

pub use api::{ApiError, HealthResponse, UploadResponse};
pub use static_files::guess_content_type;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::config::Config;
use crate::exclusion::ExclusionFilter;
use crate::logging::*;
use crate::strategies::SyncPolicy;
use crate::sync::SyncEngine;
use crate::utils::shutdown_signal;

/// Shared state for every handler
#[derive(Debug, Clone)]
pub struct AppState {
	pub engine: Arc<SyncEngine>,
	pub filter: Arc<ExclusionFilter>,
	pub ui_dir: PathBuf,
	pub default_policy: SyncPolicy,
}

impl AppState {
	/// Build handler state from a validated configuration
	pub fn from_config(config: &Config) -> Result<Self, Box<dyn Error>> {
		let filter = Arc::new(config.exclusion_filter()?);
		let engine = Arc::new(SyncEngine::new(config.docs_root.clone(), Arc::clone(&filter)));
		Ok(AppState {
			engine,
			filter,
			ui_dir: config.ui_dir.clone(),
			default_policy: config.default_policy,
		})
	}

	/// Document root served by the listing and file routes
	pub fn docs_root(&self) -> &std::path::Path {
		self.engine.root()
	}
}

/// Build the application router
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
	Router::new()
		.route("/api/health", get(api::health))
		.route("/api/folder", get(api::list_root))
		.route("/api/folder/", get(api::list_root))
		.route("/api/folder/*path", get(api::list_folder))
		.route("/api/file/*path", get(api::get_file))
		.route(
			"/api/upload",
			post(api::upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
		)
		.route("/", get(static_files::serve_index))
		.route("/ui/*path", get(static_files::serve_asset))
		.with_state(state)
}

/// Run the HTTP server until SIGINT or SIGTERM
pub async fn serve(mut config: Config) -> Result<(), Box<dyn Error>> {
	if !config.docs_root.is_dir() {
		let fallback = std::env::current_dir()?;
		warn!(
			"Document root {} does not exist, serving {} instead",
			config.docs_root.display(),
			fallback.display()
		);
		config.docs_root = fallback;
	}
	if !config.ui_dir.join("index.html").is_file() {
		warn!("No index.html in UI directory {}", config.ui_dir.display());
	}

	let state = AppState::from_config(&config)?;
	let app = router(state, config.max_upload_bytes());

	let addr = config.bind_addr();
	let listener = tokio::net::TcpListener::bind(&addr).await?;
	info!("Serving {} on http://{}", config.docs_root.display(), addr);

	axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
	info!("Server stopped");
	Ok(())
}

// vim: ts=4
