//! JSON REST surface for the stray reconciliation tracker.
//!
//! Exposes an axum [`Router`] backed by any
//! [`ReconciliationStore`](stray_core::store::ReconciliationStore). Two
//! collaborators talk to it: the dimension source pushes snapshot refreshes,
//! the fact source posts batches of observed references. Everything else is
//! read-only reporting. Auth, TLS, and transport concerns are the caller's
//! responsibility.

pub mod batches;
pub mod entries;
pub mod error;
pub mod snapshots;
pub mod summary;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use stray_core::{reconcile::SnapshotSet, store::ReconciliationStore};
use tokio::sync::RwLock;

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
///
/// Snapshots live here, not in the store: the dimension source replaces them
/// at whatever cadence it chooses, and classification reads whichever set is
/// current when a batch arrives.
#[derive(Clone)]
pub struct AppState<S> {
  pub store:     Arc<S>,
  pub snapshots: Arc<RwLock<SnapshotSet>>,
}

impl<S> AppState<S> {
  /// Fresh state with no snapshots loaded yet. Batches are rejected until
  /// the dimension source pushes a snapshot for their kind.
  pub fn new(store: Arc<S>) -> Self {
    Self {
      store,
      snapshots: Arc::new(RwLock::new(SnapshotSet::new())),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: ReconciliationStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Dimension snapshots
    .route(
      "/snapshots/{kind}",
      get(snapshots::get_one::<S>).put(snapshots::replace::<S>),
    )
    // Batch intake
    .route("/batches", post(batches::submit::<S>))
    // Reporting reads
    .route("/entries", get(entries::list::<S>))
    .route("/entries/top", get(entries::top::<S>))
    .route("/entries/{kind}/{value}", get(entries::get_one::<S>))
    .route("/summary", get(summary::handler::<S>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
