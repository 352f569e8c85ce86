//! Outcome records written back by the prediction, allocation, and forecast
//! collaborators.
//!
//! All three backing tables are append-only audit logs; rows are never
//! updated or deleted. "Current" values are resolved at read time by taking
//! the row with the greatest surrogate id among matches (latest wins).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Input for a stored idle-probability prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPrediction {
  pub room_id:          i64,
  pub date:             NaiveDate,
  pub time_slot:        String,
  /// Likelihood the room/slot is unoccupied, in `[0, 1]`.
  pub idle_probability: f64,
}

/// A stored prediction. The surrogate `id` is monotonic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
  pub id:               i64,
  pub room_id:          i64,
  pub date:             NaiveDate,
  pub time_slot:        String,
  pub idle_probability: f64,
}

/// One allocation decision, recorded for audit. The persisted row also
/// carries a server-assigned `allocated_at` timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRecord {
  pub request_id: i64,
  pub room_id:    i64,
  pub score:      Option<f64>,
}

/// One demand-forecast summary row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
  pub forecast_date:    NaiveDate,
  pub time_slot:        String,
  pub historical_count: i64,
  pub intensity_score:  f64,
}

/// Per-slot request count within a trailing window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDemand {
  pub time_slot:     String,
  pub request_count: i64,
}
