//! Allocation requests and their status state machine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Request lifecycle. The only legal transition is `Pending` → `Allocated`;
/// a request is never moved back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
  Pending,
  Allocated,
}

impl RequestStatus {
  pub fn is_pending(self) -> bool { matches!(self, Self::Pending) }
}

/// Input for creating a request through the write surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRequest {
  pub capacity:        i64,
  pub date:            NaiveDate,
  pub time_slot:       String,
  pub priority_weight: f64,
  pub stakeholder_id:  String,
}

/// A persisted allocation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRequest {
  pub id:              i64,
  pub capacity:        i64,
  pub date:            NaiveDate,
  pub time_slot:       String,
  pub priority_weight: f64,
  pub stakeholder_id:  String,
  pub status:          RequestStatus,
}
