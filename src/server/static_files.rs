//! Browser UI serving

use std::path::{Path as FsPath, PathBuf};

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use super::AppState;
use crate::logging::*;

/// Serve `index.html` from the UI directory
pub async fn serve_index(State(state): State<AppState>) -> Response {
	let path = state.ui_dir.join("index.html");

	match tokio::fs::read(&path).await {
		Ok(content) => {
			([(header::CONTENT_TYPE, "text/html; charset=utf-8")], content).into_response()
		}
		Err(e) => {
			error!("Failed to read {}: {}", path.display(), e);
			(StatusCode::NOT_FOUND, "UI not found").into_response()
		}
	}
}

/// Serve one asset below the UI directory
pub async fn serve_asset(State(state): State<AppState>, Path(path): Path<String>) -> Response {
	let clean_path = path.trim_start_matches('/');
	if clean_path.split('/').any(|part| part == "..") {
		return (StatusCode::BAD_REQUEST, "Invalid path").into_response();
	}

	let file_path: PathBuf = state.ui_dir.join(clean_path);
	match tokio::fs::read(&file_path).await {
		Ok(content) => {
			([(header::CONTENT_TYPE, guess_content_type(&file_path))], content).into_response()
		}
		Err(_) => (StatusCode::NOT_FOUND, "File not found").into_response(),
	}
}

/// Guess a content type from the file extension
pub fn guess_content_type(path: &FsPath) -> &'static str {
	let ext = path.extension().and_then(|e| e.to_str()).map(|e| e.to_lowercase());
	match ext.as_deref() {
		Some("html") | Some("htm") => "text/html; charset=utf-8",
		Some("js") | Some("mjs") => "application/javascript; charset=utf-8",
		Some("css") => "text/css; charset=utf-8",
		Some("json") => "application/json; charset=utf-8",
		Some("md") => "text/markdown; charset=utf-8",
		Some("txt") | Some("log") => "text/plain; charset=utf-8",
		Some("csv") => "text/csv; charset=utf-8",
		Some("yaml") | Some("yml") => "text/yaml; charset=utf-8",
		Some("xml") => "application/xml",
		Some("pdf") => "application/pdf",
		Some("svg") => "image/svg+xml",
		Some("png") => "image/png",
		Some("jpg") | Some("jpeg") => "image/jpeg",
		Some("gif") => "image/gif",
		Some("webp") => "image/webp",
		Some("ico") => "image/x-icon",
		Some("woff") => "font/woff",
		Some("woff2") => "font/woff2",
		Some("zip") => "application/zip",
		_ => "application/octet-stream",
	}
}


// vim: ts=4
