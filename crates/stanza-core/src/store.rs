//! The `OccupancyStore` trait — the consumer contract of the storage layer.
//!
//! The trait is implemented by storage backends (e.g. `stanza-store-sqlite`).
//! External prediction, allocation, and forecast collaborators depend on this
//! abstraction and on nothing else; no other access path into storage exists.
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes.

use std::future::Future;

use chrono::NaiveDate;

use crate::{
  booking::TrainingRecord,
  outcome::{
    AllocationRecord, ForecastRecord, NewPrediction, Prediction, SlotDemand,
  },
  request::{AllocationRequest, NewRequest, RequestStatus},
  room::{Room, RoomCapacity},
};

/// Abstraction over an occupancy store backend.
///
/// Reads never fail on legitimate absence of history — they return `None` or
/// an empty collection instead. Writes are append-only apart from the single
/// permitted status transition (`PENDING` → `ALLOCATED`); batch writes either
/// fully commit or roll back.
pub trait OccupancyStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Look up a catalog room by id. Returns `None` if not found.
  fn room(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Room>, Self::Error>> + Send + '_;

  /// Mean of `occupied` over all history for (room, slot), or `None` when no
  /// rows match.
  fn occupancy_frequency<'a>(
    &'a self,
    room_id: i64,
    time_slot: &'a str,
  ) -> impl Future<Output = Result<Option<f64>, Self::Error>> + Send + 'a;

  /// Mean of `occupied` over rows with `target − window ≤ date < target`,
  /// or `None` when the window is empty.
  fn rolling_occupancy<'a>(
    &'a self,
    room_id: i64,
    time_slot: &'a str,
    target_date: NaiveDate,
    window_days: u32,
  ) -> impl Future<Output = Result<Option<f64>, Self::Error>> + Send + 'a;

  /// System-wide mean of `occupied`, or the configured default probability
  /// when history is empty. Never an error for an empty store.
  fn global_occupancy_frequency(
    &self,
  ) -> impl Future<Output = Result<f64, Self::Error>> + Send + '_;

  /// Distinct slots observed in history, falling back to the configured slot
  /// list when history is empty. Stable sorted order either way.
  fn known_time_slots(
    &self,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  /// Full history joined with room type, ordered by (date, room_id,
  /// time_slot) ascending — a reproducible feed for external model training.
  fn training_history(
    &self,
  ) -> impl Future<Output = Result<Vec<TrainingRecord>, Self::Error>> + Send + '_;

  /// Room id/capacity pairs ordered by id ascending.
  fn rooms_for_allocation(
    &self,
  ) -> impl Future<Output = Result<Vec<RoomCapacity>, Self::Error>> + Send + '_;

  /// PENDING requests for the given date/slot, ordered by (date, slot, id)
  /// ascending.
  fn pending_requests<'a>(
    &'a self,
    date: NaiveDate,
    time_slot: &'a str,
  ) -> impl Future<Output = Result<Vec<AllocationRequest>, Self::Error>> + Send + 'a;

  /// All PENDING requests, globally ordered by (date, slot, id) ascending.
  fn all_pending_requests(
    &self,
  ) -> impl Future<Output = Result<Vec<AllocationRequest>, Self::Error>> + Send + '_;

  /// One prediction per room for the given date/slot — the row with the
  /// greatest surrogate id per room (latest wins), ordered by room id.
  fn idle_predictions<'a>(
    &'a self,
    date: NaiveDate,
    time_slot: &'a str,
  ) -> impl Future<Output = Result<Vec<Prediction>, Self::Error>> + Send + 'a;

  /// Counts of past requests per slot with
  /// `target − lookback ≤ requested_date < target`, ordered by slot ascending.
  fn request_counts_by_slot(
    &self,
    lookback_days: u32,
    target_date: NaiveDate,
  ) -> impl Future<Output = Result<Vec<SlotDemand>, Self::Error>> + Send + '_;

  // ── Writes — append-only ──────────────────────────────────────────────

  /// Append one idle-probability prediction.
  fn save_prediction(
    &self,
    prediction: NewPrediction,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Append a batch of forecast summaries. An empty batch is a no-op.
  fn save_forecast_logs<'a>(
    &'a self,
    batch: &'a [ForecastRecord],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Append a batch of allocation decisions. An empty batch is a no-op.
  fn save_allocation_logs<'a>(
    &'a self,
    batch: &'a [AllocationRecord],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Persist a new request and return its generated id. New requests always
  /// start PENDING.
  fn create_request(
    &self,
    request: NewRequest,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// Bulk PENDING → ALLOCATED transition. An empty id list is a no-op;
  /// re-marking an already-ALLOCATED id is a harmless no-op.
  fn mark_requests_allocated<'a>(
    &'a self,
    ids: &'a [i64],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Diagnostics ───────────────────────────────────────────────────────

  fn count_predictions(
    &self,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  fn count_allocation_logs(
    &self,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  fn count_forecast_logs(
    &self,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// Current status of a request, or `None` if the id is unknown.
  fn request_status(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<RequestStatus>, Self::Error>> + Send + '_;
}
