//! Booking-history records — the immutable occupancy facts.
//!
//! History grows only by insertion. Duplicate (room, date, slot) keys are
//! silently ignored on write; first write wins.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One observed (room, day, slot) occupancy outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRecord {
  pub room_id:   i64,
  pub date:      NaiveDate,
  pub time_slot: String,
  pub occupied:  bool,
}

/// A booking record joined with its room's type — the stable, reproducible
/// training feed for the external idle-probability predictor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingRecord {
  pub room_id:   i64,
  pub date:      NaiveDate,
  pub time_slot: String,
  pub occupied:  bool,
  pub room_type: String,
}
