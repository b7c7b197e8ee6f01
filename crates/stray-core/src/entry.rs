//! Bookkeeping rows for dangling keys and their per-kind rollup.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::reference::ReferenceKind;

/// One row per distinct dangling `(kind, key_value)` pair.
///
/// Created on the first dangling observation of its key, accumulated on every
/// later one, never deleted by the tracker. An entry whose key later appears
/// in the dimension goes stale rather than vanishing; spotting staleness is a
/// reporting concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationEntry {
  pub kind:             ReferenceKind,
  pub key_value:        String,
  /// Dangling observations ever recorded for this key; always >= 1.
  pub occurrence_count: u64,
  /// Minimum `observed_at` ever recorded. Never later than `last_seen`.
  pub first_seen:       DateTime<Utc>,
  /// Maximum `observed_at` ever recorded.
  pub last_seen:        DateTime<Utc>,
}

/// Per-kind rollup over all entries; feeds data-quality summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindSummary {
  pub kind:                ReferenceKind,
  pub distinct_keys:       u64,
  pub total_occurrences:   u64,
  /// `None` when no entry exists for the kind.
  pub earliest_first_seen: Option<DateTime<Utc>>,
  pub latest_last_seen:    Option<DateTime<Utc>>,
}
