//! The `ReconciliationStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `stray-store-sqlite`).
//! Higher layers (`stray-api`, the server binary) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  aggregate::DeltaMap,
  entry::{KindSummary, ReconciliationEntry},
  reference::ReferenceKind,
};

/// Abstraction over a reconciliation store backend.
///
/// Writes are accumulate-only: `apply` folds one batch's deltas into per-key
/// entries, and nothing ever deletes an entry. All methods return `Send`
/// futures so the trait can be used in multi-threaded async runtimes
/// (e.g. tokio with `axum`).
pub trait ReconciliationStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fold one batch's deltas into the store, atomically across all keys.
  ///
  /// For an unknown key an entry is created from the delta verbatim; for a
  /// known key `occurrence_count` grows by `delta.count`, `first_seen` takes
  /// the earlier timestamp and `last_seen` the later. Concurrent calls
  /// touching the same key must serialize with no lost updates.
  ///
  /// The store keeps no batch identity: applying the same batch twice counts
  /// it twice. At-least-once callers must retry only batches whose `apply`
  /// failed to commit.
  fn apply(
    &self,
    deltas: DeltaMap,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Point lookup. Returns `None` for keys never observed dangling.
  fn entry<'a>(
    &'a self,
    kind: ReferenceKind,
    key_value: &'a str,
  ) -> impl Future<Output = Result<Option<ReconciliationEntry>, Self::Error>>
  + Send
  + 'a;

  /// All entries for a kind, ordered by `key_value` ascending.
  fn query(
    &self,
    kind: ReferenceKind,
  ) -> impl Future<Output = Result<Vec<ReconciliationEntry>, Self::Error>>
  + Send
  + '_;

  /// The `limit` most-observed entries for a kind, ordered by
  /// `occurrence_count` descending, then `key_value` ascending.
  fn top(
    &self,
    kind: ReferenceKind,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<ReconciliationEntry>, Self::Error>>
  + Send
  + '_;

  /// Rollup across all entries of a kind.
  fn summary(
    &self,
    kind: ReferenceKind,
  ) -> impl Future<Output = Result<KindSummary, Self::Error>> + Send + '_;
}
