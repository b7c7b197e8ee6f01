//! Handler for `POST /batches` — the fact-source intake.
//!
//! One request is one batch: it is classified and aggregated in full before
//! the store is touched, and the store applies it in one transaction. Callers
//! retry a failed request whole. A batch that returned 200 must not be
//! resubmitted: the store keeps no batch identity and would count it again.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use stray_core::{
  reconcile::{BatchReport, reconcile},
  reference::{ReferenceKind, ReferenceRecord},
  store::ReconciliationStore,
};

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct RecordBody {
  /// The raw referenced identifier; null or missing means the fact row
  /// carried none.
  pub value:       Option<String>,
  pub observed_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct BatchBody {
  pub kind:    ReferenceKind,
  pub records: Vec<RecordBody>,
}

/// `POST /batches` — body:
/// `{"kind":"brand","records":[{"value":"XYZ","observed_at":"..."}]}`
pub async fn submit<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<BatchBody>,
) -> Result<Json<BatchReport>, ApiError>
where
  S: ReconciliationStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let kind = body.kind;
  let records: Vec<ReferenceRecord> = body
    .records
    .into_iter()
    .map(|r| ReferenceRecord::new(kind, r.value, r.observed_at))
    .collect();

  let snapshots = state.snapshots.read().await;
  let report = reconcile(state.store.as_ref(), &snapshots, records).await?;

  tracing::info!(
    batch_id = %report.batch_id,
    kind = %kind,
    total = report.total,
    dangling = report.dangling,
    absent = report.absent,
    "batch reconciled"
  );

  Ok(Json(report))
}
