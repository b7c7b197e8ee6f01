//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{DateTime, TimeZone, Utc};
use stray_core::{
  aggregate::{DeltaMap, OccurrenceDelta},
  reference::{ReferenceKey, ReferenceKind},
  store::ReconciliationStore,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn day(d: u32) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2025, 1, d, 0, 0, 0).unwrap()
}

fn delta(
  kind: ReferenceKind,
  value: &str,
  count: u64,
  first: DateTime<Utc>,
  last: DateTime<Utc>,
) -> DeltaMap {
  let mut deltas = DeltaMap::new();
  deltas.insert(
    ReferenceKey { kind, value: value.to_owned() },
    OccurrenceDelta {
      count,
      first_observed: first,
      last_observed:  last,
    },
  );
  deltas
}

// ─── Apply ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn apply_creates_entry_from_delta() {
  let s = store().await;
  s.apply(delta(ReferenceKind::Brand, "XYZ", 2, day(1), day(2)))
    .await
    .unwrap();

  let entry = s.entry(ReferenceKind::Brand, "XYZ").await.unwrap().unwrap();
  assert_eq!(entry.kind, ReferenceKind::Brand);
  assert_eq!(entry.key_value, "XYZ");
  assert_eq!(entry.occurrence_count, 2);
  assert_eq!(entry.first_seen, day(1));
  assert_eq!(entry.last_seen, day(2));
}

#[tokio::test]
async fn apply_accumulates_across_batches() {
  let s = store().await;
  s.apply(delta(ReferenceKind::Brand, "A", 3, day(1), day(2)))
    .await
    .unwrap();
  s.apply(delta(ReferenceKind::Brand, "A", 2, day(3), day(4)))
    .await
    .unwrap();

  let entry = s.entry(ReferenceKind::Brand, "A").await.unwrap().unwrap();
  assert_eq!(entry.occurrence_count, 5);
  assert_eq!(entry.first_seen, day(1));
  assert_eq!(entry.last_seen, day(4));
}

#[tokio::test]
async fn apply_widens_seen_window_backwards() {
  // A later batch can carry earlier observations (out-of-order delivery);
  // first_seen must move back while last_seen stays put.
  let s = store().await;
  s.apply(delta(ReferenceKind::User, "u1", 1, day(10), day(10)))
    .await
    .unwrap();
  s.apply(delta(ReferenceKind::User, "u1", 1, day(2), day(2)))
    .await
    .unwrap();

  let entry = s.entry(ReferenceKind::User, "u1").await.unwrap().unwrap();
  assert_eq!(entry.occurrence_count, 2);
  assert_eq!(entry.first_seen, day(2));
  assert_eq!(entry.last_seen, day(10));
}

#[tokio::test]
async fn apply_empty_deltas_is_a_noop() {
  let s = store().await;
  s.apply(DeltaMap::new()).await.unwrap();
  assert!(s.query(ReferenceKind::Brand).await.unwrap().is_empty());
}

#[tokio::test]
async fn apply_whole_batch_in_one_call() {
  let s = store().await;

  let mut deltas = delta(ReferenceKind::Brand, "B", 1, day(1), day(1));
  deltas.extend(delta(ReferenceKind::Brand, "A", 4, day(2), day(3)));
  deltas.extend(delta(ReferenceKind::User, "u9", 2, day(1), day(5)));
  s.apply(deltas).await.unwrap();

  assert_eq!(s.query(ReferenceKind::Brand).await.unwrap().len(), 2);
  assert_eq!(s.query(ReferenceKind::User).await.unwrap().len(), 1);
}

#[tokio::test]
async fn entry_preserves_sub_second_timestamps() {
  let s = store().await;
  let at = Utc.timestamp_micros(1_735_689_600_123_456).unwrap();
  s.apply(delta(ReferenceKind::Brand, "T", 1, at, at))
    .await
    .unwrap();

  let entry = s.entry(ReferenceKind::Brand, "T").await.unwrap().unwrap();
  assert_eq!(entry.first_seen, at);
  assert_eq!(entry.last_seen, at);
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn entry_returns_none_for_unknown_key() {
  let s = store().await;
  let entry = s.entry(ReferenceKind::Brand, "NOPE").await.unwrap();
  assert!(entry.is_none());
}

#[tokio::test]
async fn query_orders_by_key_value_ascending() {
  let s = store().await;
  for value in ["ZULU", "ALPHA", "MIKE"] {
    s.apply(delta(ReferenceKind::Brand, value, 1, day(1), day(1)))
      .await
      .unwrap();
  }

  let entries = s.query(ReferenceKind::Brand).await.unwrap();
  let values: Vec<_> = entries.iter().map(|e| e.key_value.as_str()).collect();
  assert_eq!(values, ["ALPHA", "MIKE", "ZULU"]);
}

#[tokio::test]
async fn query_filters_by_kind() {
  let s = store().await;
  s.apply(delta(ReferenceKind::Brand, "SHARED", 1, day(1), day(1)))
    .await
    .unwrap();
  s.apply(delta(ReferenceKind::User, "SHARED", 1, day(1), day(1)))
    .await
    .unwrap();

  let brands = s.query(ReferenceKind::Brand).await.unwrap();
  assert_eq!(brands.len(), 1);
  assert_eq!(brands[0].kind, ReferenceKind::Brand);
}

#[tokio::test]
async fn top_orders_by_count_then_key_and_limits() {
  let s = store().await;
  s.apply(delta(ReferenceKind::Brand, "RARE", 1, day(1), day(1)))
    .await
    .unwrap();
  s.apply(delta(ReferenceKind::Brand, "COMMON", 9, day(1), day(2)))
    .await
    .unwrap();
  s.apply(delta(ReferenceKind::Brand, "ALSO", 9, day(1), day(2)))
    .await
    .unwrap();
  s.apply(delta(ReferenceKind::Brand, "MID", 4, day(1), day(2)))
    .await
    .unwrap();

  let top = s.top(ReferenceKind::Brand, 3).await.unwrap();
  let values: Vec<_> = top.iter().map(|e| e.key_value.as_str()).collect();
  assert_eq!(values, ["ALSO", "COMMON", "MID"]);
}

#[tokio::test]
async fn summary_of_empty_kind_is_all_zeroes() {
  let s = store().await;
  let summary = s.summary(ReferenceKind::User).await.unwrap();
  assert_eq!(summary.distinct_keys, 0);
  assert_eq!(summary.total_occurrences, 0);
  assert!(summary.earliest_first_seen.is_none());
  assert!(summary.latest_last_seen.is_none());
}

#[tokio::test]
async fn summary_rolls_up_entries() {
  let s = store().await;
  s.apply(delta(ReferenceKind::Brand, "A", 3, day(2), day(5)))
    .await
    .unwrap();
  s.apply(delta(ReferenceKind::Brand, "B", 2, day(1), day(3)))
    .await
    .unwrap();
  s.apply(delta(ReferenceKind::User, "u1", 7, day(1), day(9)))
    .await
    .unwrap();

  let summary = s.summary(ReferenceKind::Brand).await.unwrap();
  assert_eq!(summary.distinct_keys, 2);
  assert_eq!(summary.total_occurrences, 5);
  assert_eq!(summary.earliest_first_seen, Some(day(1)));
  assert_eq!(summary.latest_last_seen, Some(day(5)));
}

// ─── Concurrency ─────────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_applies_lose_no_updates() {
  let s = store().await;

  let mut handles = Vec::new();
  for i in 0..16u32 {
    let s = s.clone();
    let at = day(1 + (i % 28));
    handles.push(tokio::spawn(async move {
      s.apply(delta(ReferenceKind::Brand, "HOT", 1, at, at)).await
    }));
  }
  for handle in handles {
    handle.await.unwrap().unwrap();
  }

  let entry = s.entry(ReferenceKind::Brand, "HOT").await.unwrap().unwrap();
  assert_eq!(entry.occurrence_count, 16);
}
