//! [`SqliteStore`] — the SQLite implementation of [`ReconciliationStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use stray_core::{
  aggregate::DeltaMap,
  entry::{KindSummary, ReconciliationEntry},
  reference::ReferenceKind,
  store::ReconciliationStore,
};

use crate::{
  Error, Result,
  encode::{RawEntry, decode_dt, encode_dt, encode_kind},
  schema::SCHEMA,
};

/// Upsert issued once per key within a batch transaction. For a known key the
/// count accumulates and the seen window widens; the fixed-width timestamp
/// encoding makes the text `min`/`max` chronological.
const UPSERT: &str = "
INSERT INTO reconciliation_entries
    (kind, key_value, occurrence_count, first_seen, last_seen)
VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT (kind, key_value) DO UPDATE SET
    occurrence_count = occurrence_count + excluded.occurrence_count,
    first_seen       = min(first_seen, excluded.first_seen),
    last_seen        = max(last_seen,  excluded.last_seen)";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A reconciliation store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All calls
/// funnel through the connection's worker thread, so concurrent `apply`
/// calls serialize and per-key updates are never lost.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

fn read_raw(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawEntry> {
  Ok(RawEntry {
    kind:             row.get(0)?,
    key_value:        row.get(1)?,
    occurrence_count: row.get(2)?,
    first_seen:       row.get(3)?,
    last_seen:        row.get(4)?,
  })
}

// ─── ReconciliationStore impl ────────────────────────────────────────────────

impl ReconciliationStore for SqliteStore {
  type Error = Error;

  async fn apply(&self, deltas: DeltaMap) -> Result<()> {
    if deltas.is_empty() {
      return Ok(());
    }

    let rows: Vec<(String, String, i64, String, String)> = deltas
      .into_iter()
      .map(|(key, delta)| {
        (
          encode_kind(key.kind).to_owned(),
          key.value,
          delta.count as i64,
          encode_dt(delta.first_observed),
          encode_dt(delta.last_observed),
        )
      })
      .collect();

    // One transaction per batch: either every key's delta lands or none does.
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare_cached(UPSERT)?;
          for (kind, key_value, count, first_seen, last_seen) in &rows {
            stmt.execute(rusqlite::params![
              kind, key_value, count, first_seen, last_seen
            ])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn entry(
    &self,
    kind: ReferenceKind,
    key_value: &str,
  ) -> Result<Option<ReconciliationEntry>> {
    let kind_str = encode_kind(kind).to_owned();
    let key_str = key_value.to_owned();

    let raw: Option<RawEntry> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT kind, key_value, occurrence_count, first_seen, last_seen
               FROM reconciliation_entries
               WHERE kind = ?1 AND key_value = ?2",
              rusqlite::params![kind_str, key_str],
              read_raw,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawEntry::into_entry).transpose()
  }

  async fn query(&self, kind: ReferenceKind) -> Result<Vec<ReconciliationEntry>> {
    let kind_str = encode_kind(kind).to_owned();

    let raws: Vec<RawEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT kind, key_value, occurrence_count, first_seen, last_seen
           FROM reconciliation_entries
           WHERE kind = ?1
           ORDER BY key_value ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![kind_str], read_raw)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEntry::into_entry).collect()
  }

  async fn top(
    &self,
    kind: ReferenceKind,
    limit: usize,
  ) -> Result<Vec<ReconciliationEntry>> {
    let kind_str = encode_kind(kind).to_owned();
    let limit_val = limit as i64;

    let raws: Vec<RawEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT kind, key_value, occurrence_count, first_seen, last_seen
           FROM reconciliation_entries
           WHERE kind = ?1
           ORDER BY occurrence_count DESC, key_value ASC
           LIMIT ?2",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![kind_str, limit_val], read_raw)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEntry::into_entry).collect()
  }

  async fn summary(&self, kind: ReferenceKind) -> Result<KindSummary> {
    let kind_str = encode_kind(kind).to_owned();

    let (distinct, total, earliest, latest): (
      i64,
      i64,
      Option<String>,
      Option<String>,
    ) = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*), COALESCE(SUM(occurrence_count), 0),
                  MIN(first_seen), MAX(last_seen)
           FROM reconciliation_entries
           WHERE kind = ?1",
          rusqlite::params![kind_str],
          |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )?)
      })
      .await?;

    Ok(KindSummary {
      kind,
      distinct_keys:       distinct as u64,
      total_occurrences:   total as u64,
      earliest_first_seen: earliest.as_deref().map(decode_dt).transpose()?,
      latest_last_seen:    latest.as_deref().map(decode_dt).transpose()?,
    })
  }
}
