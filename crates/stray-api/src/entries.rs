//! Handlers for `/entries` reporting reads.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET` | `/entries?kind=` | All entries for a kind, key ascending |
//! | `GET` | `/entries/top?kind=[&limit=]` | Most-observed entries; default limit 5 |
//! | `GET` | `/entries/:kind/:value` | Point lookup; 404 if never seen dangling |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use serde::Deserialize;
use stray_core::{
  entry::ReconciliationEntry, reference::ReferenceKind,
  store::ReconciliationStore,
};

use crate::{AppState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub kind: ReferenceKind,
}

/// `GET /entries?kind=<kind>`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<ReconciliationEntry>>, ApiError>
where
  S: ReconciliationStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let entries = state
    .store
    .query(params.kind)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(entries))
}

// ─── Top ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TopParams {
  pub kind:  ReferenceKind,
  /// How many entries to return; defaults to 5.
  pub limit: Option<usize>,
}

/// `GET /entries/top?kind=<kind>[&limit=<n>]`
pub async fn top<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<TopParams>,
) -> Result<Json<Vec<ReconciliationEntry>>, ApiError>
where
  S: ReconciliationStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let limit = params.limit.unwrap_or(5);
  let entries = state
    .store
    .top(params.kind, limit)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(entries))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /entries/:kind/:value`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path((kind, value)): Path<(ReferenceKind, String)>,
) -> Result<Json<ReconciliationEntry>, ApiError>
where
  S: ReconciliationStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let entry = state
    .store
    .entry(kind, &value)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::NotFound(format!("no entry for {kind} key {value:?}"))
    })?;
  Ok(Json(entry))
}
