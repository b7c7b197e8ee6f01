//! Error type for `stray-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A `kind` column held a discriminant this build does not know.
  #[error("unknown reference kind: {0:?}")]
  UnknownKind(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
