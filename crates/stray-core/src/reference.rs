//! Reference records — the observed uses of dimension keys inside fact rows.
//!
//! A reference record is a single sighting of a foreign-key value in a fact
//! row (a line item's brand code, a receipt's user id). Records are supplied
//! by the ingestion pipeline; the tracker never parses fact rows itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which dimension table a reference points into.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReferenceKind {
  /// Line-item brand codes, resolving against the brands dimension.
  Brand,
  /// Receipt user ids, resolving against the users dimension.
  User,
}

/// A single observed use of a dimension key inside a fact row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRecord {
  pub kind:        ReferenceKind,
  /// The raw referenced identifier. `None` and `""` both mean the fact row
  /// carried no usable key at all.
  pub value:       Option<String>,
  /// Scan/creation time of the owning fact row, not of this sighting.
  pub observed_at: DateTime<Utc>,
}

impl ReferenceRecord {
  pub fn new(
    kind: ReferenceKind,
    value: Option<String>,
    observed_at: DateTime<Utc>,
  ) -> Self {
    Self { kind, value, observed_at }
  }
}

/// The exact `(kind, value)` pair that dangling observations group under.
///
/// Comparison is case-sensitive with no normalization, matching the literal
/// equality the dimension joins use.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReferenceKey {
  pub kind:  ReferenceKind,
  pub value: String,
}
