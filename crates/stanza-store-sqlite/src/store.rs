//! [`SqliteStore`] — the SQLite implementation of [`OccupancyStore`].

use std::sync::Arc;

use chrono::{Days, NaiveDate};
use rusqlite::OptionalExtension as _;
use stanza_core::{
  Config,
  booking::TrainingRecord,
  outcome::{
    AllocationRecord, ForecastRecord, NewPrediction, Prediction, SlotDemand,
  },
  request::{AllocationRequest, NewRequest, RequestStatus},
  room::{Room, RoomCapacity},
  store::OccupancyStore,
};

use crate::{
  Error, Result,
  encode::{
    RawPrediction, RawRequest, RawTraining, decode_status, encode_date,
    encode_status,
  },
  schema,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An occupancy store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Every
/// operation runs as a scoped closure on the store's database thread and
/// commits before returning; no statement state is held across operations.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn:   tokio_rusqlite::Connection,
  pub(crate) config: Arc<Config>,
}

impl SqliteStore {
  /// Open (or create) the store at the configured database path and run
  /// schema initialisation.
  pub async fn open(config: Config) -> Result<Self> {
    config.validate()?;
    std::fs::create_dir_all(&config.data_dir)?;

    let conn =
      tokio_rusqlite::Connection::open(config.database_path()).await?;
    let store = Self { conn, config: Arc::new(config) };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory(config: Config) -> Result<Self> {
    config.validate()?;
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, config: Arc::new(config) };
    store.init_schema().await?;
    Ok(store)
  }

  /// The configuration this store was opened with.
  pub fn config(&self) -> &Config { &self.config }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        schema::ensure_schema(conn)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  pub(crate) async fn count(&self, sql: &'static str) -> Result<i64> {
    let n = self
      .conn
      .call(move |conn| Ok(conn.query_row(sql, [], |row| row.get(0))?))
      .await?;
    Ok(n)
  }
}

// ─── OccupancyStore impl ─────────────────────────────────────────────────────

impl OccupancyStore for SqliteStore {
  type Error = Error;

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn room(&self, id: i64) -> Result<Option<Room>> {
    let room = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, name, capacity, room_type, location
               FROM rooms WHERE id = ?1",
              rusqlite::params![id],
              |row| {
                Ok(Room {
                  id:        row.get(0)?,
                  name:      row.get(1)?,
                  capacity:  row.get(2)?,
                  room_type: row.get(3)?,
                  location:  row.get(4)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;
    Ok(room)
  }

  async fn occupancy_frequency(
    &self,
    room_id: i64,
    time_slot: &str,
  ) -> Result<Option<f64>> {
    let slot = time_slot.to_owned();
    let mean = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT AVG(occupied) FROM booking_history
           WHERE room_id = ?1 AND time_slot = ?2",
          rusqlite::params![room_id, slot],
          |row| row.get::<_, Option<f64>>(0),
        )?)
      })
      .await?;
    Ok(mean)
  }

  async fn rolling_occupancy(
    &self,
    room_id: i64,
    time_slot: &str,
    target_date: NaiveDate,
    window_days: u32,
  ) -> Result<Option<f64>> {
    let slot = time_slot.to_owned();
    // Window is [target − window, target): strictly before the target day.
    let from = encode_date(target_date - Days::new(u64::from(window_days)));
    let until = encode_date(target_date);

    let mean = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT AVG(occupied) FROM booking_history
           WHERE room_id = ?1 AND time_slot = ?2
             AND date >= ?3 AND date < ?4",
          rusqlite::params![room_id, slot, from, until],
          |row| row.get::<_, Option<f64>>(0),
        )?)
      })
      .await?;
    Ok(mean)
  }

  async fn global_occupancy_frequency(&self) -> Result<f64> {
    let mean = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "SELECT AVG(occupied) FROM booking_history",
          [],
          |row| row.get::<_, Option<f64>>(0),
        )?)
      })
      .await?;
    Ok(mean.unwrap_or(self.config.prediction.default_occupancy_probability))
  }

  async fn known_time_slots(&self) -> Result<Vec<String>> {
    let observed: Vec<String> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT DISTINCT time_slot FROM booking_history
           ORDER BY time_slot ASC",
        )?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    if !observed.is_empty() {
      return Ok(observed);
    }

    let mut fallback = self.config.synthetic.time_slots.clone();
    fallback.sort();
    Ok(fallback)
  }

  async fn training_history(&self) -> Result<Vec<TrainingRecord>> {
    let raws: Vec<RawTraining> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT h.room_id, h.date, h.time_slot, h.occupied, r.room_type
           FROM booking_history h
           JOIN rooms r ON r.id = h.room_id
           ORDER BY h.date ASC, h.room_id ASC, h.time_slot ASC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawTraining {
              room_id:   row.get(0)?,
              date:      row.get(1)?,
              time_slot: row.get(2)?,
              occupied:  row.get(3)?,
              room_type: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTraining::into_record).collect()
  }

  async fn rooms_for_allocation(&self) -> Result<Vec<RoomCapacity>> {
    let rooms = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT id, capacity FROM rooms ORDER BY id ASC")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RoomCapacity { id: row.get(0)?, capacity: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rooms)
  }

  async fn pending_requests(
    &self,
    date: NaiveDate,
    time_slot: &str,
  ) -> Result<Vec<AllocationRequest>> {
    let date_str = encode_date(date);
    let slot = time_slot.to_owned();

    let raws: Vec<RawRequest> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, requested_capacity, requested_date,
                  requested_time_slot, priority_weight, stakeholder_id, status
           FROM requests
           WHERE status = ?1
             AND requested_date = ?2 AND requested_time_slot = ?3
           ORDER BY requested_date ASC, requested_time_slot ASC, id ASC",
        )?;
        let rows = stmt
          .query_map(
            rusqlite::params![
              encode_status(RequestStatus::Pending),
              date_str,
              slot
            ],
            read_request_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRequest::into_request).collect()
  }

  async fn all_pending_requests(&self) -> Result<Vec<AllocationRequest>> {
    let raws: Vec<RawRequest> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, requested_capacity, requested_date,
                  requested_time_slot, priority_weight, stakeholder_id, status
           FROM requests
           WHERE status = ?1
           ORDER BY requested_date ASC, requested_time_slot ASC, id ASC",
        )?;
        let rows = stmt
          .query_map(
            rusqlite::params![encode_status(RequestStatus::Pending)],
            read_request_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRequest::into_request).collect()
  }

  async fn idle_predictions(
    &self,
    date: NaiveDate,
    time_slot: &str,
  ) -> Result<Vec<Prediction>> {
    let date_str = encode_date(date);
    let slot = time_slot.to_owned();

    let raws: Vec<RawPrediction> = self
      .conn
      .call(move |conn| {
        // Latest-wins: the row with the greatest surrogate id per room.
        let mut stmt = conn.prepare(
          "SELECT p.id, p.room_id, p.date, p.time_slot, p.idle_probability
           FROM predictions p
           JOIN (
               SELECT room_id, MAX(id) AS latest_id
               FROM predictions
               WHERE date = ?1 AND time_slot = ?2
               GROUP BY room_id
           ) latest ON latest.latest_id = p.id
           ORDER BY p.room_id ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![date_str, slot], |row| {
            Ok(RawPrediction {
              id:               row.get(0)?,
              room_id:          row.get(1)?,
              date:             row.get(2)?,
              time_slot:        row.get(3)?,
              idle_probability: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPrediction::into_prediction).collect()
  }

  async fn request_counts_by_slot(
    &self,
    lookback_days: u32,
    target_date: NaiveDate,
  ) -> Result<Vec<SlotDemand>> {
    let from = encode_date(target_date - Days::new(u64::from(lookback_days)));
    let until = encode_date(target_date);

    let counts = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT requested_time_slot, COUNT(*)
           FROM requests
           WHERE requested_date >= ?1 AND requested_date < ?2
           GROUP BY requested_time_slot
           ORDER BY requested_time_slot ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![from, until], |row| {
            Ok(SlotDemand {
              time_slot:     row.get(0)?,
              request_count: row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(counts)
  }

  // ── Writes — append-only ──────────────────────────────────────────────────

  async fn save_prediction(&self, prediction: NewPrediction) -> Result<()> {
    let date_str = encode_date(prediction.date);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO predictions (room_id, date, time_slot, idle_probability)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![
            prediction.room_id,
            date_str,
            prediction.time_slot,
            prediction.idle_probability,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn save_forecast_logs(&self, batch: &[ForecastRecord]) -> Result<()> {
    if batch.is_empty() {
      return Ok(());
    }

    let rows: Vec<(String, String, i64, f64)> = batch
      .iter()
      .map(|r| {
        (
          encode_date(r.forecast_date),
          r.time_slot.clone(),
          r.historical_count,
          r.intensity_score,
        )
      })
      .collect();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO demand_forecast_logs
                 (forecast_date, time_slot, historical_count,
                  demand_intensity_score)
             VALUES (?1, ?2, ?3, ?4)",
          )?;
          for (date, slot, count, score) in &rows {
            stmt.execute(rusqlite::params![date, slot, count, score])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn save_allocation_logs(
    &self,
    batch: &[AllocationRecord],
  ) -> Result<()> {
    if batch.is_empty() {
      return Ok(());
    }

    let rows: Vec<(i64, i64, Option<f64>)> =
      batch.iter().map(|r| (r.request_id, r.room_id, r.score)).collect();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO allocation_logs (request_id, room_id, allocation_score)
             VALUES (?1, ?2, ?3)",
          )?;
          for (request_id, room_id, score) in &rows {
            stmt.execute(rusqlite::params![request_id, room_id, score])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn create_request(&self, request: NewRequest) -> Result<i64> {
    let date_str = encode_date(request.date);
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO requests
               (requested_capacity, requested_date, requested_time_slot,
                priority_weight, stakeholder_id, status)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            request.capacity,
            date_str,
            request.time_slot,
            request.priority_weight,
            request.stakeholder_id,
            encode_status(RequestStatus::Pending),
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    Ok(id)
  }

  async fn mark_requests_allocated(&self, ids: &[i64]) -> Result<()> {
    if ids.is_empty() {
      return Ok(());
    }

    let ids = ids.to_vec();
    self
      .conn
      .call(move |conn| {
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
          "UPDATE requests SET status = '{}' WHERE id IN ({placeholders})",
          encode_status(RequestStatus::Allocated)
        );
        conn.execute(&sql, rusqlite::params_from_iter(ids.iter()))?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Diagnostics ───────────────────────────────────────────────────────────

  async fn count_predictions(&self) -> Result<i64> {
    self.count("SELECT COUNT(*) FROM predictions").await
  }

  async fn count_allocation_logs(&self) -> Result<i64> {
    self.count("SELECT COUNT(*) FROM allocation_logs").await
  }

  async fn count_forecast_logs(&self) -> Result<i64> {
    self.count("SELECT COUNT(*) FROM demand_forecast_logs").await
  }

  async fn request_status(&self, id: i64) -> Result<Option<RequestStatus>> {
    let status: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT status FROM requests WHERE id = ?1",
              rusqlite::params![id],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    status.as_deref().map(decode_status).transpose()
  }
}

/// Shared row mapper for the request projections.
fn read_request_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRequest> {
  Ok(RawRequest {
    id:              row.get(0)?,
    capacity:        row.get(1)?,
    date:            row.get(2)?,
    time_slot:       row.get(3)?,
    priority_weight: row.get(4)?,
    stakeholder_id:  row.get(5)?,
    status:          row.get(6)?,
  })
}
