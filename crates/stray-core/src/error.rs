//! Error types for `stray-core`.

use thiserror::Error;

use crate::reference::ReferenceKind;

#[derive(Debug, Error)]
pub enum Error {
  /// A record was classified against a snapshot built for another kind.
  /// This is a caller bug; it fails the whole batch and is never retried.
  #[error("cannot classify a {reference} reference against a {snapshot} snapshot")]
  KindMismatch {
    reference: ReferenceKind,
    snapshot:  ReferenceKind,
  },

  #[error("no snapshot loaded for kind {0}")]
  SnapshotMissing(ReferenceKind),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
