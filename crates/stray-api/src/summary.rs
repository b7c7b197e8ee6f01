//! Handler for `GET /summary`.
//!
//! Without `kind`, sweeps every kind so one call fetches the whole
//! data-quality picture.

use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;
use strum::IntoEnumIterator as _;
use stray_core::{
  entry::KindSummary, reference::ReferenceKind, store::ReconciliationStore,
};

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize, Default)]
pub struct SummaryParams {
  pub kind: Option<ReferenceKind>,
}

/// `GET /summary[?kind=<kind>]`
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<SummaryParams>,
) -> Result<Json<Vec<KindSummary>>, ApiError>
where
  S: ReconciliationStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let kinds: Vec<ReferenceKind> = match params.kind {
    Some(kind) => vec![kind],
    None => ReferenceKind::iter().collect(),
  };

  let mut summaries = Vec::with_capacity(kinds.len());
  for kind in kinds {
    let summary = state
      .store
      .summary(kind)
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?;
    summaries.push(summary);
  }

  Ok(Json(summaries))
}
