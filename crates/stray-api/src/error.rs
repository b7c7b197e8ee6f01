//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// A batch arrived for a kind with no snapshot loaded yet. The dimension
  /// source must push one first; the batch is safe to resubmit afterwards.
  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

impl From<stray_core::Error> for ApiError {
  fn from(e: stray_core::Error) -> Self {
    match e {
      stray_core::Error::SnapshotMissing(kind) => {
        ApiError::Conflict(format!("no snapshot loaded for kind {kind}"))
      }
      // KindMismatch is a server-side bug and store failures are internal;
      // both surface as 500.
      other => ApiError::Store(Box::new(other)),
    }
  }
}
