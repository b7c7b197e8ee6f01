//! Batch-local occurrence aggregation for dangling references.
//!
//! Aggregation folds one batch's classified records into per-key deltas. It
//! is pure and batch-scoped: merging a delta with the historical entry is
//! the store's job.

use std::collections::{BTreeMap, btree_map::Entry};

use chrono::{DateTime, Utc};

use crate::{
  reference::{ReferenceKey, ReferenceRecord},
  snapshot::Classification,
};

/// Per-key accumulation of dangling observations within a single batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccurrenceDelta {
  /// Dangling observations of the key in this batch; always >= 1.
  pub count:          u64,
  /// Minimum `observed_at` within the batch.
  pub first_observed: DateTime<Utc>,
  /// Maximum `observed_at` within the batch.
  pub last_observed:  DateTime<Utc>,
}

impl OccurrenceDelta {
  fn observe(&mut self, at: DateTime<Utc>) {
    self.count += 1;
    self.first_observed = self.first_observed.min(at);
    self.last_observed = self.last_observed.max(at);
  }
}

/// One batch's aggregated deltas, keyed by `(kind, value)`.
/// `BTreeMap` keeps the mapping identical for any input order.
pub type DeltaMap = BTreeMap<ReferenceKey, OccurrenceDelta>;

/// Fold classified references into per-key deltas.
///
/// Only `Dangling` records contribute; each duplicate within the batch
/// counts. Batches that contain several kinds group cleanly, since the kind
/// is part of the key.
pub fn aggregate<I>(classified: I) -> DeltaMap
where
  I: IntoIterator<Item = (ReferenceRecord, Classification)>,
{
  let mut deltas = DeltaMap::new();

  for (record, classification) in classified {
    if classification != Classification::Dangling {
      continue;
    }
    // Dangling implies a non-empty value; a pair violating that cannot group.
    let Some(value) = record.value else { continue };

    let key = ReferenceKey { kind: record.kind, value };
    match deltas.entry(key) {
      Entry::Vacant(slot) => {
        slot.insert(OccurrenceDelta {
          count:          1,
          first_observed: record.observed_at,
          last_observed:  record.observed_at,
        });
      }
      Entry::Occupied(mut slot) => slot.get_mut().observe(record.observed_at),
    }
  }

  deltas
}
