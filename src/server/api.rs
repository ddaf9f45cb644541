//! JSON API handlers

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tokio::task::JoinError;

use super::static_files::guess_content_type;
use super::AppState;
use crate::error::{ListError, StagingError, SyncError};
use crate::listing::{DirectoryLister, FolderListing};
use crate::logging::*;
use crate::staging::Stager;
use crate::strategies::SyncPolicy;
use crate::types::OperationReport;
use crate::validation;

/// Body of `GET /api/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
	pub status: String,
}

/// Body of a successful `POST /api/upload`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
	pub message: String,
	pub operations: OperationReport,
}

/// Request failure, rendered as `{"detail": ...}`
#[derive(Debug)]
pub enum ApiError {
	NotFound(String),
	BadRequest(String),
	/// Malformed or oversized multipart body
	Multipart(MultipartError),
	Internal(String),
}

impl ApiError {
	pub fn status(&self) -> StatusCode {
		match self {
			ApiError::NotFound(_) => StatusCode::NOT_FOUND,
			ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
			ApiError::Multipart(e) => e.status(),
			ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	pub fn detail(&self) -> String {
		match self {
			ApiError::NotFound(d) | ApiError::BadRequest(d) | ApiError::Internal(d) => d.clone(),
			ApiError::Multipart(e) => e.body_text(),
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let status = self.status();
		let detail = self.detail();
		if status.is_server_error() {
			error!("{}", detail);
		} else {
			debug!("{}: {}", status, detail);
		}
		(status, Json(serde_json::json!({ "detail": detail }))).into_response()
	}
}

impl From<ListError> for ApiError {
	fn from(e: ListError) -> Self {
		ApiError::NotFound(e.to_string())
	}
}

impl From<StagingError> for ApiError {
	fn from(e: StagingError) -> Self {
		ApiError::BadRequest(e.to_string())
	}
}

impl From<SyncError> for ApiError {
	fn from(e: SyncError) -> Self {
		ApiError::BadRequest(e.to_string())
	}
}

impl From<MultipartError> for ApiError {
	fn from(e: MultipartError) -> Self {
		ApiError::Multipart(e)
	}
}

impl From<JoinError> for ApiError {
	fn from(e: JoinError) -> Self {
		ApiError::Internal(format!("Background task failed: {}", e))
	}
}

pub async fn health() -> Json<HealthResponse> {
	Json(HealthResponse { status: "Docs-addon is healthy".to_string() })
}

pub async fn list_root(State(state): State<AppState>) -> Result<Json<FolderListing>, ApiError> {
	list(state, String::new()).await
}

pub async fn list_folder(
	State(state): State<AppState>,
	Path(path): Path<String>,
) -> Result<Json<FolderListing>, ApiError> {
	list(state, path).await
}

async fn list(state: AppState, path: String) -> Result<Json<FolderListing>, ApiError> {
	let listing = tokio::task::spawn_blocking(move || {
		DirectoryLister::new(state.docs_root(), &state.filter).list(&path)
	})
	.await??;
	Ok(Json(listing))
}

/// Stream back one regular file under the document root
pub async fn get_file(
	State(state): State<AppState>,
	Path(path): Path<String>,
) -> Result<Response, ApiError> {
	let not_found = || ApiError::NotFound(format!("File not found: {}", path));

	let file_path =
		validation::resolve_under_root(state.docs_root(), &path).map_err(|_| not_found())?;
	match tokio::fs::metadata(&file_path).await {
		Ok(meta) if meta.is_file() => {}
		_ => return Err(not_found()),
	}

	let content = tokio::fs::read(&file_path).await.map_err(|e| {
		warn!("Failed to read {}: {}", file_path.display(), e);
		not_found()
	})?;
	let content_type = guess_content_type(&file_path);
	Ok(([(header::CONTENT_TYPE, content_type)], content).into_response())
}

/// Accept a multipart upload and sync it into the document root
///
/// Fields: `files` (repeatable, relative path in the part's file name),
/// `target_path` (default: the root) and `policy` (default from config).
pub async fn upload(
	State(state): State<AppState>,
	mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
	let mut parts: Vec<(String, Bytes)> = Vec::new();
	let mut target_path = String::new();
	let mut policy = state.default_policy;

	while let Some(field) = multipart.next_field().await? {
		let field_name = field.name().unwrap_or_default().to_string();
		match field_name.as_str() {
			"files" | "file" => {
				let file_name = match field.file_name() {
					Some(n) => n.to_string(),
					None => {
						return Err(ApiError::BadRequest(
							"Uploaded file part has no file name".to_string(),
						))
					}
				};
				let data = field.bytes().await?;
				parts.push((file_name, data));
			}
			"target_path" => target_path = field.text().await?,
			"policy" => {
				let text = field.text().await?;
				if !text.trim().is_empty() {
					policy = text.parse::<SyncPolicy>().map_err(ApiError::BadRequest)?;
				}
			}
			other => debug!("Ignoring multipart field {:?}", other),
		}
	}

	if parts.is_empty() {
		return Err(ApiError::BadRequest("No files uploaded".to_string()));
	}

	info!(
		"Upload of {} files into {:?} ({})",
		parts.len(),
		if target_path.is_empty() { "." } else { target_path.as_str() },
		policy
	);

	let engine = Arc::clone(&state.engine);
	let report = tokio::task::spawn_blocking(move || -> Result<OperationReport, ApiError> {
		let mut stager = Stager::new()?;
		for (name, data) in &parts {
			stager.stage(name, data)?;
		}
		debug!("Staged {} distinct paths in {}", stager.staged().len(), stager.path().display());
		Ok(engine.sync(stager.path(), &target_path, policy)?)
	})
	.await??;

	let message = if report.has_errors() {
		format!("Upload and sync completed with {} errors", report.errors.len())
	} else {
		"Upload and sync completed".to_string()
	};
	Ok(Json(UploadResponse { message, operations: report }))
}

// vim: ts=4
