//! The classify → aggregate → apply pipeline over one batch of references.
//!
//! Classification and aggregation are pure and run to completion before the
//! store is touched, so a failed batch leaves the store unwritten and the
//! caller can retry it whole.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  aggregate::aggregate,
  reference::{ReferenceKind, ReferenceRecord},
  snapshot::{Classification, DimensionSnapshot},
  store::ReconciliationStore,
};

// ─── SnapshotSet ─────────────────────────────────────────────────────────────

/// The current snapshot for each kind, at most one per kind.
///
/// Inserting a snapshot replaces the previous one for its kind; how often
/// that happens is the dimension source's call.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSet {
  snapshots: HashMap<ReferenceKind, DimensionSnapshot>,
}

impl SnapshotSet {
  pub fn new() -> Self { Self::default() }

  /// Install `snapshot` for its kind, returning the one it replaced.
  pub fn insert(
    &mut self,
    snapshot: DimensionSnapshot,
  ) -> Option<DimensionSnapshot> {
    self.snapshots.insert(snapshot.kind(), snapshot)
  }

  pub fn get(&self, kind: ReferenceKind) -> Option<&DimensionSnapshot> {
    self.snapshots.get(&kind)
  }

  fn classify(&self, record: &ReferenceRecord) -> Result<Classification> {
    let snapshot = self
      .snapshots
      .get(&record.kind)
      .ok_or(Error::SnapshotMissing(record.kind))?;
    snapshot.classify(record)
  }
}

// ─── BatchReport ─────────────────────────────────────────────────────────────

/// Per-batch outcome counts, returned to the ingestion caller.
///
/// `batch_id` is assigned here and only ever logged; the store keeps no batch
/// identity, so at-least-once callers correlate retries through it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
  pub batch_id:          Uuid,
  pub total:             u64,
  pub resolved:          u64,
  pub dangling:          u64,
  /// References with a null or empty key. Excluded from the store; counted
  /// here so the reporting layer can bucket them.
  pub absent:            u64,
  /// Distinct `(kind, value)` pairs the batch contributed deltas for.
  pub distinct_dangling: u64,
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

/// Run one batch through classification, aggregation and the store.
///
/// A mismatched kind or missing snapshot fails the batch with nothing
/// written. A store failure also leaves nothing applied (the store's `apply`
/// is transactional across the batch), so the caller may retry the whole
/// batch. No retry happens here.
pub async fn reconcile<S>(
  store: &S,
  snapshots: &SnapshotSet,
  records: Vec<ReferenceRecord>,
) -> Result<BatchReport>
where
  S: ReconciliationStore,
{
  let mut resolved = 0u64;
  let mut dangling = 0u64;
  let mut absent = 0u64;

  let mut classified = Vec::with_capacity(records.len());
  for record in records {
    let classification = snapshots.classify(&record)?;
    match classification {
      Classification::Resolved => resolved += 1,
      Classification::Dangling => dangling += 1,
      Classification::Absent => absent += 1,
    }
    classified.push((record, classification));
  }

  let total = resolved + dangling + absent;
  let deltas = aggregate(classified);
  let distinct_dangling = deltas.len() as u64;

  if !deltas.is_empty() {
    store
      .apply(deltas)
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;
  }

  Ok(BatchReport {
    batch_id: Uuid::new_v4(),
    total,
    resolved,
    dangling,
    absent,
    distinct_dangling,
  })
}
