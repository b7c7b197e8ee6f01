//! Handlers for `/snapshots/{kind}` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `PUT`  | `/snapshots/:kind` | Body: `{"keys":[...]}`; replaces the kind's snapshot |
//! | `GET`  | `/snapshots/:kind` | Current snapshot metadata; 404 before first load |

use axum::{
  Json,
  extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use stray_core::{
  reference::ReferenceKind, snapshot::DimensionSnapshot,
  store::ReconciliationStore,
};

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct SnapshotBody {
  /// The dimension's current key column. Empty strings and duplicates are
  /// dropped on load.
  pub keys: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SnapshotInfo {
  pub kind:          ReferenceKind,
  pub distinct_keys: usize,
}

/// `PUT /snapshots/:kind` — install the kind's current dimension snapshot.
pub async fn replace<S>(
  State(state): State<AppState<S>>,
  Path(kind): Path<ReferenceKind>,
  Json(body): Json<SnapshotBody>,
) -> Result<Json<SnapshotInfo>, ApiError>
where
  S: ReconciliationStore + Clone + Send + Sync + 'static,
{
  let snapshot = DimensionSnapshot::new(kind, body.keys);
  let info = SnapshotInfo { kind, distinct_keys: snapshot.len() };

  state.snapshots.write().await.insert(snapshot);
  tracing::info!(
    kind = %kind,
    distinct_keys = info.distinct_keys,
    "snapshot replaced"
  );

  Ok(Json(info))
}

/// `GET /snapshots/:kind`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(kind): Path<ReferenceKind>,
) -> Result<Json<SnapshotInfo>, ApiError>
where
  S: ReconciliationStore + Clone + Send + Sync + 'static,
{
  let snapshots = state.snapshots.read().await;
  let snapshot = snapshots.get(kind).ok_or_else(|| {
    ApiError::NotFound(format!("no snapshot loaded for kind {kind}"))
  })?;

  Ok(Json(SnapshotInfo { kind, distinct_keys: snapshot.len() }))
}
