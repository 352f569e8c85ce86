//! Error type for `stanza-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] stanza_core::Error),

  #[error("dataset error: {0}")]
  Dataset(#[from] stanza_dataset::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// Catalog rows expected to exist were absent after the seeding attempt.
  /// History seeding is aborted to protect referential integrity.
  #[error("room catalog incomplete after seeding, missing ids {0:?}")]
  MissingCatalogRooms(Vec<i64>),

  #[error("date parse error: {0}")]
  DateParse(String),

  #[error("unknown request status: {0:?}")]
  UnknownStatus(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
