//! Error types for `stanza-core`.
//!
//! Every variant here is a configuration fault, surfaced before any file or
//! database I/O is attempted.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("synthetic seed day count must be positive")]
  NonPositiveSeedDays,

  #[error("time slot list must not be empty")]
  EmptyTimeSlots,

  #[error(
    "weekday occupied probability {value} outside acceptable band [{low}, {high}]"
  )]
  WeekdayProbabilityOutOfBand { value: f64, low: f64, high: f64 },

  #[error(
    "weekend occupied probability {value} outside acceptable band [{low}, {high}]"
  )]
  WeekendProbabilityOutOfBand { value: f64, low: f64, high: f64 },

  #[error("default occupancy probability {0} outside [0, 1]")]
  DefaultProbabilityOutOfRange(f64),

  #[error("configuration source error: {0}")]
  Source(#[from] config::ConfigError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
