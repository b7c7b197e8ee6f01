//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 UTC strings with fixed microsecond
//! precision, so SQL `min`/`max` and `ORDER BY` over the text columns agree
//! with chronological order. Kinds are stored as lowercase discriminants.

use chrono::{DateTime, SecondsFormat, Utc};
use stray_core::{entry::ReconciliationEntry, reference::ReferenceKind};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── ReferenceKind ───────────────────────────────────────────────────────────

pub fn encode_kind(kind: ReferenceKind) -> &'static str {
  match kind {
    ReferenceKind::Brand => "brand",
    ReferenceKind::User => "user",
  }
}

pub fn decode_kind(s: &str) -> Result<ReferenceKind> {
  match s {
    "brand" => Ok(ReferenceKind::Brand),
    "user" => Ok(ReferenceKind::User),
    other => Err(Error::UnknownKind(other.to_owned())),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `reconciliation_entries` row.
pub struct RawEntry {
  pub kind:             String,
  pub key_value:        String,
  pub occurrence_count: i64,
  pub first_seen:       String,
  pub last_seen:        String,
}

impl RawEntry {
  pub fn into_entry(self) -> Result<ReconciliationEntry> {
    Ok(ReconciliationEntry {
      kind:             decode_kind(&self.kind)?,
      key_value:        self.key_value,
      occurrence_count: self.occurrence_count as u64,
      first_seen:       decode_dt(&self.first_seen)?,
      last_seen:        decode_dt(&self.last_seen)?,
    })
  }
}
