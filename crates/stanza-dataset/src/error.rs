//! Error types for the stanza-dataset codec.
//!
//! Import-format variants carry the 1-based file line they were detected on
//! (the header is line 1) so a rejected import is actionable.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("configuration error: {0}")]
  Config(#[from] stanza_core::Error),

  #[error("dataset file io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[error(
    "line 1: header must be exactly \"room_id,date,time_slot,occupied\", found {found:?}"
  )]
  Header { found: Vec<String> },

  #[error("line {line}: missing or empty field {field:?}")]
  MissingField { line: u64, field: &'static str },

  #[error("line {line}: room_id {value:?} is not an integer")]
  BadRoomId { line: u64, value: String },

  #[error("line {line}: room_id {room_id} is not in the catalog")]
  UnknownRoom { line: u64, room_id: i64 },

  #[error("line {line}: date {value:?} is not an ISO calendar date")]
  BadDate { line: u64, value: String },

  #[error("line {line}: unknown time slot {value:?}")]
  UnknownSlot { line: u64, value: String },

  #[error("line {line}: occupied must be exactly 0 or 1, found {value:?}")]
  BadOccupied { line: u64, value: String },

  #[error("line {line}: duplicate key ({room_id}, {date}, {time_slot})")]
  DuplicateKey {
    line:      u64,
    room_id:   i64,
    date:      NaiveDate,
    time_slot: String,
  },

  #[error("expected {expected} rows, found {found}")]
  RowCount { expected: u64, found: u64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
