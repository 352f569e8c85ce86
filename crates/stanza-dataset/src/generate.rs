//! Deterministic synthetic-history generation.
//!
//! The draw sequence is pinned: a ChaCha8 RNG seeded from the configured
//! value, one `f64` draw per (day, room, slot) in day-ascending, room-id-
//! ascending, configured-slot order. Identical configuration therefore always
//! regenerates the same logical dataset.

use std::fs;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use stanza_core::{Config, booking::BookingRecord, room};

use crate::error::Result;

/// Column order of the dataset file header.
pub const HEADER: [&str; 4] = ["room_id", "date", "time_slot", "occupied"];

/// Outcome of [`ensure_dataset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFile {
  /// A file already existed at the configured path and was left untouched.
  Existing,
  /// The file was generated by this call.
  Generated,
}

/// Generate the occupancy calendar at the configured path unless a file is
/// already there. An existing file is the source of truth and is never
/// overwritten.
///
/// Generation parameters are validated before any I/O. First-time creation
/// claims the path with `create_new`, so two processes racing to generate
/// produce exactly one file; the losing racer observes the claim and backs
/// off as if the file had always existed.
pub fn ensure_dataset(config: &Config) -> Result<DatasetFile> {
  config.validate()?;

  let path = config.dataset_path();
  if path.exists() {
    return Ok(DatasetFile::Existing);
  }
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent)?;
  }

  let file = match fs::OpenOptions::new()
    .write(true)
    .create_new(true)
    .open(&path)
  {
    Ok(file) => file,
    Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
      return Ok(DatasetFile::Existing);
    }
    Err(err) => return Err(err.into()),
  };

  let rows = generate_rows(config);
  if let Err(err) = write_rows(file, &rows) {
    // Never leave a partial dataset behind the claim.
    let _ = fs::remove_file(&path);
    return Err(err);
  }

  tracing::info!(
    rows = rows.len(),
    path = %path.display(),
    "generated synthetic dataset"
  );
  Ok(DatasetFile::Generated)
}

/// Produce the full deterministic calendar: exactly one row per
/// (day, room, slot) combination, `rooms × seed_days × slots` rows total.
///
/// Dates cover the `seed_days` calendar days ending the day before the
/// reference end date, in chronological order. The occupied flag for each row
/// is drawn against the day-type probability (weekday vs. weekend).
pub fn generate_rows(config: &Config) -> Vec<BookingRecord> {
  let synthetic = &config.synthetic;
  let room_ids = room::catalog_ids();

  let mut rng = ChaCha8Rng::seed_from_u64(synthetic.seed);
  let mut rows = Vec::with_capacity(
    synthetic.seed_days as usize * room_ids.len() * synthetic.time_slots.len(),
  );

  for offset in (1..=synthetic.seed_days).rev() {
    let date = synthetic.reference_end_date - Days::new(u64::from(offset));
    let probability = if is_weekend(date) {
      synthetic.weekend_occupied_probability
    } else {
      synthetic.weekday_occupied_probability
    };

    for &room_id in &room_ids {
      for slot in &synthetic.time_slots {
        rows.push(BookingRecord {
          room_id,
          date,
          time_slot: slot.clone(),
          occupied: rng.random::<f64>() < probability,
        });
      }
    }
  }

  rows
}

fn is_weekend(date: NaiveDate) -> bool {
  matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn write_rows(file: fs::File, rows: &[BookingRecord]) -> Result<()> {
  let mut writer = csv::Writer::from_writer(file);
  writer.write_record(HEADER)?;
  for row in rows {
    writer.write_record([
      row.room_id.to_string(),
      row.date.format("%Y-%m-%d").to_string(),
      row.time_slot.clone(),
      u8::from(row.occupied).to_string(),
    ])?;
  }
  writer.flush()?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use stanza_core::Error as CoreError;

  use super::*;
  use crate::error::Error;

  fn test_config(dir: &std::path::Path) -> Config {
    let mut cfg = Config::default();
    cfg.data_dir = dir.to_path_buf();
    cfg
  }

  #[test]
  fn generation_is_deterministic() {
    let cfg = Config::default();
    assert_eq!(generate_rows(&cfg), generate_rows(&cfg));
  }

  #[test]
  fn different_seeds_diverge() {
    let base = Config::default();
    let mut reseeded = Config::default();
    reseeded.synthetic.seed = 43;

    let occupied = |cfg: &Config| -> Vec<bool> {
      generate_rows(cfg).iter().map(|r| r.occupied).collect()
    };
    assert_ne!(occupied(&base), occupied(&reseeded));
  }

  #[test]
  fn row_count_and_date_range() {
    let cfg = Config::default();
    let rows = generate_rows(&cfg);
    assert_eq!(rows.len(), 10 * 21 * 4);

    let end = cfg.synthetic.reference_end_date;
    assert_eq!(rows.first().unwrap().date, end - Days::new(21));
    assert_eq!(rows.last().unwrap().date, end - Days::new(1));
  }

  #[test]
  fn ensure_dataset_creates_then_reuses_file() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = test_config(dir.path());

    assert_eq!(ensure_dataset(&cfg).unwrap(), DatasetFile::Generated);
    let first = std::fs::read(cfg.dataset_path()).unwrap();

    assert_eq!(ensure_dataset(&cfg).unwrap(), DatasetFile::Existing);
    assert_eq!(std::fs::read(cfg.dataset_path()).unwrap(), first);
  }

  #[test]
  fn existing_file_is_never_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = test_config(dir.path());
    std::fs::write(cfg.dataset_path(), "room_id,date,time_slot,occupied\n")
      .unwrap();

    assert_eq!(ensure_dataset(&cfg).unwrap(), DatasetFile::Existing);
    let content = std::fs::read_to_string(cfg.dataset_path()).unwrap();
    assert_eq!(content, "room_id,date,time_slot,occupied\n");
  }

  #[test]
  fn out_of_band_probability_fails_before_io() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = test_config(dir.path());
    cfg.synthetic.weekday_occupied_probability = 0.95;

    let err = ensure_dataset(&cfg).unwrap_err();
    assert!(matches!(
      err,
      Error::Config(CoreError::WeekdayProbabilityOutOfBand { .. })
    ));
    assert!(!cfg.dataset_path().exists());
  }
}
