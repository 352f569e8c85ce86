//! SQL schema for the Stanza SQLite store.
//!
//! [`ensure_schema`] is safe to run on every startup: table/index DDL uses
//! "if not exists" semantics, and the two migration steps (booking-history
//! dedup-then-constrain, requests column drift) are no-ops once applied.

use rusqlite::{Connection, OptionalExtension as _, Transaction};

/// Per-connection pragmas. Applied outside the DDL transaction because
/// SQLite cannot switch journal modes inside one.
const PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
";

/// Table and index DDL; idempotent thanks to `IF NOT EXISTS`.
///
/// The unique booking-history index is deliberately absent here — it is
/// established by the dedup-then-constrain migration after duplicate rows
/// from pre-constraint deployments have been removed.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS rooms (
    id         INTEGER PRIMARY KEY,
    name       TEXT NOT NULL,
    capacity   INTEGER NOT NULL CHECK (capacity > 0),
    room_type  TEXT NOT NULL,
    location   TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Booking history is strictly append-only; duplicate (room, date, slot)
-- inserts are ignored, first write wins.
CREATE TABLE IF NOT EXISTS booking_history (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    room_id   INTEGER NOT NULL REFERENCES rooms(id),
    date      TEXT NOT NULL,
    time_slot TEXT NOT NULL,
    occupied  INTEGER NOT NULL CHECK (occupied IN (0, 1))
);

CREATE TABLE IF NOT EXISTS requests (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    requested_capacity  INTEGER NOT NULL CHECK (requested_capacity > 0),
    requested_date      TEXT NOT NULL,
    requested_time_slot TEXT NOT NULL,
    priority_weight     REAL NOT NULL DEFAULT 1.0,
    stakeholder_id      TEXT NOT NULL DEFAULT 'unassigned',
    status              TEXT NOT NULL DEFAULT 'PENDING'
);

CREATE TABLE IF NOT EXISTS allocation_logs (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    request_id       INTEGER NOT NULL REFERENCES requests(id),
    room_id          INTEGER NOT NULL REFERENCES rooms(id),
    allocation_score REAL,
    allocated_at     TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS predictions (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    room_id          INTEGER NOT NULL REFERENCES rooms(id),
    date             TEXT NOT NULL,
    time_slot        TEXT NOT NULL,
    idle_probability REAL NOT NULL CHECK (idle_probability BETWEEN 0.0 AND 1.0)
);

CREATE TABLE IF NOT EXISTS demand_forecast_logs (
    id                     INTEGER PRIMARY KEY AUTOINCREMENT,
    forecast_date          TEXT NOT NULL,
    time_slot              TEXT NOT NULL,
    historical_count       INTEGER NOT NULL CHECK (historical_count >= 0),
    demand_intensity_score REAL NOT NULL
);

CREATE INDEX IF NOT EXISTS requests_date_slot_status_idx
    ON requests(requested_date, requested_time_slot, status);
CREATE INDEX IF NOT EXISTS booking_history_room_slot_date_idx
    ON booking_history(room_id, time_slot, date);
CREATE INDEX IF NOT EXISTS predictions_room_date_slot_idx
    ON predictions(room_id, date, time_slot);
";

const BOOKING_HISTORY_KEY_IDX: &str = "booking_history_key_idx";

/// Create or repair the full schema. All DDL and migrations share one
/// transaction, so a failed call applies nothing and the next call retries
/// safely.
pub fn ensure_schema(conn: &mut Connection) -> rusqlite::Result<()> {
  conn.execute_batch(PRAGMAS)?;

  let tx = conn.transaction()?;
  tx.execute_batch(SCHEMA)?;
  enforce_booking_history_unique(&tx)?;
  ensure_stakeholder_column(&tx)?;
  tx.commit()
}

/// One-time dedup-then-constrain migration.
///
/// Deployments that predate the uniqueness constraint may hold duplicate
/// (room_id, date, time_slot) rows. Keep the row with the smallest surrogate
/// id per key, then make the uniqueness permanent.
fn enforce_booking_history_unique(tx: &Transaction<'_>) -> rusqlite::Result<()> {
  let exists: bool = tx
    .query_row(
      "SELECT 1 FROM sqlite_master WHERE type = 'index' AND name = ?1",
      [BOOKING_HISTORY_KEY_IDX],
      |_| Ok(true),
    )
    .optional()?
    .unwrap_or(false);
  if exists {
    return Ok(());
  }

  let removed = tx.execute(
    "DELETE FROM booking_history
     WHERE id NOT IN (
         SELECT MIN(id) FROM booking_history
         GROUP BY room_id, date, time_slot
     )",
    [],
  )?;
  if removed > 0 {
    tracing::debug!(removed, "removed duplicate booking history rows");
  }

  tx.execute(
    &format!(
      "CREATE UNIQUE INDEX {BOOKING_HISTORY_KEY_IDX}
           ON booking_history(room_id, date, time_slot)"
    ),
    [],
  )?;
  Ok(())
}

/// Column-drift repair: stores created before `stakeholder_id` was
/// introduced gain the column with its sentinel default; existing rows are
/// untouched.
fn ensure_stakeholder_column(tx: &Transaction<'_>) -> rusqlite::Result<()> {
  let mut stmt = tx.prepare("PRAGMA table_info(requests)")?;
  let columns = stmt
    .query_map([], |row| row.get::<_, String>(1))?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  if !columns.iter().any(|c| c == "stakeholder_id") {
    tracing::debug!("adding missing requests.stakeholder_id column");
    tx.execute(
      "ALTER TABLE requests
           ADD COLUMN stakeholder_id TEXT NOT NULL DEFAULT 'unassigned'",
      [],
    )?;
  }
  Ok(())
}
