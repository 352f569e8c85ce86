//! Codecs between Rust domain values and the plain-text representations
//! stored in SQLite columns.
//!
//! Dates are ISO `%Y-%m-%d` strings (they compare correctly as text);
//! request status is stored as its upper-case name.

use chrono::NaiveDate;
use stanza_core::{
  booking::TrainingRecord,
  outcome::Prediction,
  request::{AllocationRequest, RequestStatus},
};

use crate::{Error, Result};

// ─── Dates ───────────────────────────────────────────────────────────────────

pub fn encode_date(date: NaiveDate) -> String {
  date.format("%Y-%m-%d").to_string()
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Request status ──────────────────────────────────────────────────────────

pub fn encode_status(status: RequestStatus) -> &'static str {
  match status {
    RequestStatus::Pending => "PENDING",
    RequestStatus::Allocated => "ALLOCATED",
  }
}

pub fn decode_status(s: &str) -> Result<RequestStatus> {
  match s {
    "PENDING" => Ok(RequestStatus::Pending),
    "ALLOCATED" => Ok(RequestStatus::Allocated),
    other => Err(Error::UnknownStatus(other.to_owned())),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `requests` row.
pub struct RawRequest {
  pub id:              i64,
  pub capacity:        i64,
  pub date:            String,
  pub time_slot:       String,
  pub priority_weight: f64,
  pub stakeholder_id:  String,
  pub status:          String,
}

impl RawRequest {
  pub fn into_request(self) -> Result<AllocationRequest> {
    Ok(AllocationRequest {
      id:              self.id,
      capacity:        self.capacity,
      date:            decode_date(&self.date)?,
      time_slot:       self.time_slot,
      priority_weight: self.priority_weight,
      stakeholder_id:  self.stakeholder_id,
      status:          decode_status(&self.status)?,
    })
  }
}

/// Raw strings read directly from a `predictions` row.
pub struct RawPrediction {
  pub id:               i64,
  pub room_id:          i64,
  pub date:             String,
  pub time_slot:        String,
  pub idle_probability: f64,
}

impl RawPrediction {
  pub fn into_prediction(self) -> Result<Prediction> {
    Ok(Prediction {
      id:               self.id,
      room_id:          self.room_id,
      date:             decode_date(&self.date)?,
      time_slot:        self.time_slot,
      idle_probability: self.idle_probability,
    })
  }
}

/// Raw strings read from a `booking_history` row joined with `rooms`.
pub struct RawTraining {
  pub room_id:   i64,
  pub date:      String,
  pub time_slot: String,
  pub occupied:  bool,
  pub room_type: String,
}

impl RawTraining {
  pub fn into_record(self) -> Result<TrainingRecord> {
    Ok(TrainingRecord {
      room_id:   self.room_id,
      date:      decode_date(&self.date)?,
      time_slot: self.time_slot,
      occupied:  self.occupied,
      room_type: self.room_type,
    })
  }
}
