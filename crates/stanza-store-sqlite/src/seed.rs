//! Idempotent bootstrap seeding: the fixed room catalog, then validated
//! booking history.
//!
//! Both passes use ignore-on-conflict inserts keyed by primary key (rooms)
//! or the unique (room_id, date, time_slot) index (history), so calling
//! [`SqliteStore::seed`] on every startup is safe — including concurrently,
//! where the storage engine's own locking serialises the writers.

use stanza_core::{booking::BookingRecord, room};

use crate::{Error, Result, SqliteStore, encode::encode_date};

/// Observability summary for one [`SqliteStore::seed`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
  /// Rows offered by the validated dataset.
  pub candidate_rows: usize,
  /// Rows actually inserted (post-insert count minus pre-insert count).
  pub inserted:       usize,
  /// Candidates skipped because their key already existed.
  pub duplicates:     usize,
}

impl SqliteStore {
  /// Seed the room catalog and booking history.
  ///
  /// Generates the synthetic dataset if no import file exists yet, validates
  /// it strictly, and bulk-inserts the result. A re-run after a successful
  /// seed inserts zero rows and reports every candidate as a duplicate.
  pub async fn seed(&self) -> Result<SeedReport> {
    self.seed_catalog().await?;

    let config = self.config();
    stanza_dataset::ensure_dataset(config)?;
    let rows = stanza_dataset::load_and_validate(&config.dataset_path(), config)?;
    let candidate_rows = rows.len();

    let pre = self.count_booking_history().await?;
    self.insert_booking_history(rows).await?;
    let post = self.count_booking_history().await?;

    let inserted = usize::try_from(post - pre).unwrap_or(0);
    let report = SeedReport {
      candidate_rows,
      inserted,
      duplicates: candidate_rows.saturating_sub(inserted),
    };

    tracing::info!(
      candidates = report.candidate_rows,
      inserted = report.inserted,
      duplicates = report.duplicates,
      "booking history seeded"
    );
    Ok(report)
  }

  /// Insert the fixed catalog with explicit ids, then verify every id
  /// persisted. History rows reference rooms by id, so an incomplete catalog
  /// aborts seeding before any history insert is attempted.
  pub(crate) async fn seed_catalog(&self) -> Result<()> {
    let rooms = room::catalog();
    let persisted: Vec<i64> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO rooms
                 (id, name, capacity, room_type, location)
             VALUES (?1, ?2, ?3, ?4, ?5)",
          )?;
          for room in &rooms {
            stmt.execute(rusqlite::params![
              room.id,
              room.name,
              room.capacity,
              room.room_type,
              room.location,
            ])?;
          }
        }
        tx.commit()?;

        let mut stmt = conn.prepare("SELECT id FROM rooms ORDER BY id ASC")?;
        let ids = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(ids)
      })
      .await?;

    let missing: Vec<i64> = room::catalog_ids()
      .into_iter()
      .filter(|id| !persisted.contains(id))
      .collect();
    if !missing.is_empty() {
      return Err(Error::MissingCatalogRooms(missing));
    }
    Ok(())
  }

  /// Bulk-insert validated history rows under one transaction, skipping any
  /// row whose (room_id, date, time_slot) key already exists.
  pub(crate) async fn insert_booking_history(
    &self,
    rows: Vec<BookingRecord>,
  ) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO booking_history
                 (room_id, date, time_slot, occupied)
             VALUES (?1, ?2, ?3, ?4)",
          )?;
          for row in &rows {
            stmt.execute(rusqlite::params![
              row.room_id,
              encode_date(row.date),
              row.time_slot,
              row.occupied,
            ])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  pub(crate) async fn count_booking_history(&self) -> Result<i64> {
    self.count("SELECT COUNT(*) FROM booking_history").await
  }
}
