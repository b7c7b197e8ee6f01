//! SQL schema for the stray SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per distinct dangling (kind, key_value) pair.
-- Rows are only ever inserted or accumulated into; no DELETE is ever issued.
CREATE TABLE IF NOT EXISTS reconciliation_entries (
    entry_id         INTEGER PRIMARY KEY,
    kind             TEXT    NOT NULL,   -- 'brand' | 'user'
    key_value        TEXT    NOT NULL,
    occurrence_count INTEGER NOT NULL CHECK (occurrence_count >= 1),
    first_seen       TEXT    NOT NULL,   -- fixed-width RFC 3339 UTC
    last_seen        TEXT    NOT NULL,
    UNIQUE (kind, key_value),
    CHECK  (first_seen <= last_seen)
);

-- Serves the most-frequent listing without a table scan.
CREATE INDEX IF NOT EXISTS entries_kind_count_idx
    ON reconciliation_entries(kind, occurrence_count DESC);

PRAGMA user_version = 1;
";
