//! Dimension snapshots and reference classification.
//!
//! A snapshot is the set of valid keys for one dimension at evaluation time.
//! It is supplied (and refreshed) by the surrounding system; the tracker
//! never fetches dimensions itself.

use std::collections::HashSet;

use crate::{
  Result,
  error::Error,
  reference::{ReferenceKind, ReferenceRecord},
};

// ─── Classification ──────────────────────────────────────────────────────────

/// The outcome of resolving one reference against a dimension snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
  /// The key exists in the dimension.
  Resolved,
  /// The key is non-empty but unknown to the dimension.
  Dangling,
  /// The fact row carried no key (null or empty string). Not an error, and
  /// not reconciled — counted separately by the reporting layer.
  Absent,
}

// ─── DimensionSnapshot ───────────────────────────────────────────────────────

/// The set of valid keys for one [`ReferenceKind`] at evaluation time.
#[derive(Debug, Clone)]
pub struct DimensionSnapshot {
  kind: ReferenceKind,
  keys: HashSet<String>,
}

impl DimensionSnapshot {
  /// Build a snapshot from the dimension's current key column.
  /// Empty strings and duplicates in the input are ignored.
  pub fn new<I, K>(kind: ReferenceKind, keys: I) -> Self
  where
    I: IntoIterator<Item = K>,
    K: Into<String>,
  {
    let keys = keys
      .into_iter()
      .map(Into::into)
      .filter(|k| !k.is_empty())
      .collect();
    Self { kind, keys }
  }

  pub fn kind(&self) -> ReferenceKind { self.kind }

  /// Number of distinct non-empty keys.
  pub fn len(&self) -> usize { self.keys.len() }

  /// An empty snapshot is legal: every non-empty key classifies `Dangling`.
  pub fn is_empty(&self) -> bool { self.keys.is_empty() }

  /// Exact, case-sensitive membership test.
  pub fn contains(&self, key: &str) -> bool { self.keys.contains(key) }

  /// Classify one reference against this snapshot. Pure; no side effects.
  ///
  /// A record of a different kind is a caller bug, not a data-quality
  /// outcome, and fails with [`Error::KindMismatch`].
  pub fn classify(&self, record: &ReferenceRecord) -> Result<Classification> {
    if record.kind != self.kind {
      return Err(Error::KindMismatch {
        reference: record.kind,
        snapshot:  self.kind,
      });
    }

    Ok(match record.value.as_deref() {
      None | Some("") => Classification::Absent,
      Some(key) if self.keys.contains(key) => Classification::Resolved,
      Some(_) => Classification::Dangling,
    })
  }
}
