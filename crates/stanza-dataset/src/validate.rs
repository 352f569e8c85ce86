//! Strict import validation for the synthetic dataset file.
//!
//! Validation fails closed: either the complete, exact-count row set is
//! returned, or the first offence is reported with its file line and nothing
//! is loaded. No partial result ever reaches the store.

use std::{collections::HashSet, path::Path};

use chrono::NaiveDate;
use stanza_core::{Config, booking::BookingRecord, room};

use crate::{
  error::{Error, Result},
  generate::HEADER,
};

/// Parse and validate the dataset at `path`.
///
/// Checks, in order, each independently fatal: exact header; all four fields
/// non-empty; room_id an integer inside the catalog; ISO calendar date; slot
/// from the configured set; occupied exactly `0` or `1`; no repeated
/// (room, date, slot) key; and finally an exact total row count of
/// `rooms × seed_days × slots`.
pub fn load_and_validate(
  path: &Path,
  config: &Config,
) -> Result<Vec<BookingRecord>> {
  // flexible: short records surface as our MissingField error rather than a
  // csv length error.
  let mut reader = csv::ReaderBuilder::new()
    .has_headers(true)
    .flexible(true)
    .from_path(path)?;

  let headers = reader.headers()?;
  if headers.iter().ne(HEADER) {
    return Err(Error::Header {
      found: headers.iter().map(str::to_owned).collect(),
    });
  }

  let catalog_ids: HashSet<i64> = room::catalog_ids().into_iter().collect();
  let known_slots: HashSet<&str> = config
    .synthetic
    .time_slots
    .iter()
    .map(String::as_str)
    .collect();

  let mut rows = Vec::new();
  let mut seen: HashSet<(i64, NaiveDate, String)> = HashSet::new();

  for (index, record) in reader.records().enumerate() {
    let record = record?;
    // Data records start on line 2; prefer the reader's own position so
    // quoted multi-line fields stay accurate.
    let line = record.position().map_or(index as u64 + 2, |p| p.line());

    let room_raw = require_field(&record, 0, "room_id", line)?;
    let date_raw = require_field(&record, 1, "date", line)?;
    let slot_raw = require_field(&record, 2, "time_slot", line)?;
    let occupied_raw = require_field(&record, 3, "occupied", line)?;

    let room_id: i64 = room_raw.parse().map_err(|_| Error::BadRoomId {
      line,
      value: room_raw.to_owned(),
    })?;
    if !catalog_ids.contains(&room_id) {
      return Err(Error::UnknownRoom { line, room_id });
    }

    let date =
      NaiveDate::parse_from_str(date_raw, "%Y-%m-%d").map_err(|_| {
        Error::BadDate { line, value: date_raw.to_owned() }
      })?;

    if !known_slots.contains(slot_raw) {
      return Err(Error::UnknownSlot { line, value: slot_raw.to_owned() });
    }

    let occupied = match occupied_raw {
      "0" => false,
      "1" => true,
      other => {
        return Err(Error::BadOccupied { line, value: other.to_owned() });
      }
    };

    if !seen.insert((room_id, date, slot_raw.to_owned())) {
      return Err(Error::DuplicateKey {
        line,
        room_id,
        date,
        time_slot: slot_raw.to_owned(),
      });
    }

    rows.push(BookingRecord {
      room_id,
      date,
      time_slot: slot_raw.to_owned(),
      occupied,
    });
  }

  let expected = room::catalog_ids().len() as u64
    * u64::from(config.synthetic.seed_days)
    * config.synthetic.time_slots.len() as u64;
  if rows.len() as u64 != expected {
    return Err(Error::RowCount { expected, found: rows.len() as u64 });
  }

  Ok(rows)
}

fn require_field<'r>(
  record: &'r csv::StringRecord,
  index: usize,
  field: &'static str,
  line: u64,
) -> Result<&'r str> {
  match record.get(index) {
    Some(value) if !value.is_empty() => Ok(value),
    _ => Err(Error::MissingField { line, field }),
  }
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use super::*;
  use crate::generate::ensure_dataset;

  /// One day, two slots over the fixed 10-room catalog: 20 expected rows.
  fn small_config(dir: &std::path::Path) -> Config {
    let mut cfg = Config::default();
    cfg.data_dir = dir.to_path_buf();
    cfg.synthetic.seed_days = 1;
    cfg.synthetic.time_slots = vec!["09-11".to_owned(), "11-13".to_owned()];
    cfg
  }

  fn write_dataset(dir: &std::path::Path, content: &str) -> PathBuf {
    let path = dir.join("synthetic_dataset.csv");
    std::fs::write(&path, content).unwrap();
    path
  }

  /// A fully valid small dataset: 2020-03-02 for every room and both slots.
  fn valid_content() -> String {
    let mut out = String::from("room_id,date,time_slot,occupied\n");
    for room_id in 1..=10 {
      for slot in ["09-11", "11-13"] {
        out.push_str(&format!("{room_id},2020-03-02,{slot},1\n"));
      }
    }
    out
  }

  #[test]
  fn generated_dataset_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = small_config(dir.path());

    ensure_dataset(&cfg).unwrap();
    let rows = load_and_validate(&cfg.dataset_path(), &cfg).unwrap();

    assert_eq!(rows, crate::generate::generate_rows(&cfg));
  }

  #[test]
  fn header_mismatch_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = small_config(dir.path());
    let path =
      write_dataset(dir.path(), "room,date,time_slot,occupied\n1,2020-03-02,09-11,1\n");

    assert!(matches!(
      load_and_validate(&path, &cfg).unwrap_err(),
      Error::Header { .. }
    ));
  }

  #[test]
  fn out_of_catalog_room_cites_its_line() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = small_config(dir.path());
    let mut content = valid_content();
    // Corrupt the second data row (file line 3).
    content = content.replacen("1,2020-03-02,11-13,1", "11,2020-03-02,11-13,1", 1);
    let path = write_dataset(dir.path(), &content);

    assert!(matches!(
      load_and_validate(&path, &cfg).unwrap_err(),
      Error::UnknownRoom { line: 3, room_id: 11 }
    ));
  }

  #[test]
  fn non_integer_room_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = small_config(dir.path());
    let path = write_dataset(
      dir.path(),
      "room_id,date,time_slot,occupied\nten,2020-03-02,09-11,1\n",
    );

    assert!(matches!(
      load_and_validate(&path, &cfg).unwrap_err(),
      Error::BadRoomId { line: 2, .. }
    ));
  }

  #[test]
  fn bad_date_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = small_config(dir.path());
    let path = write_dataset(
      dir.path(),
      "room_id,date,time_slot,occupied\n1,02/03/2020,09-11,1\n",
    );

    assert!(matches!(
      load_and_validate(&path, &cfg).unwrap_err(),
      Error::BadDate { line: 2, .. }
    ));
  }

  #[test]
  fn unknown_slot_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = small_config(dir.path());
    let path = write_dataset(
      dir.path(),
      "room_id,date,time_slot,occupied\n1,2020-03-02,19-21,1\n",
    );

    assert!(matches!(
      load_and_validate(&path, &cfg).unwrap_err(),
      Error::UnknownSlot { line: 2, .. }
    ));
  }

  #[test]
  fn non_binary_occupied_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = small_config(dir.path());
    for bad in ["2", "true", "01"] {
      let path = write_dataset(
        dir.path(),
        &format!("room_id,date,time_slot,occupied\n1,2020-03-02,09-11,{bad}\n"),
      );
      assert!(matches!(
        load_and_validate(&path, &cfg).unwrap_err(),
        Error::BadOccupied { line: 2, .. }
      ));
    }
  }

  #[test]
  fn empty_field_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = small_config(dir.path());
    let path = write_dataset(
      dir.path(),
      "room_id,date,time_slot,occupied\n1,2020-03-02,,1\n",
    );

    assert!(matches!(
      load_and_validate(&path, &cfg).unwrap_err(),
      Error::MissingField { line: 2, field: "time_slot" }
    ));
  }

  #[test]
  fn duplicate_key_cites_second_occurrence() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = small_config(dir.path());
    let mut content = valid_content();
    content.push_str("1,2020-03-02,09-11,0\n"); // repeats file line 2 on line 22
    let path = write_dataset(dir.path(), &content);

    assert!(matches!(
      load_and_validate(&path, &cfg).unwrap_err(),
      Error::DuplicateKey { line: 22, room_id: 1, .. }
    ));
  }

  #[test]
  fn row_count_shortfall_rejects_whole_file() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = small_config(dir.path());
    let content = valid_content();
    let trimmed = content.rsplit_once("10,2020-03-02,11-13,1\n").unwrap().0;
    let path = write_dataset(dir.path(), trimmed);

    assert!(matches!(
      load_and_validate(&path, &cfg).unwrap_err(),
      Error::RowCount { expected: 20, found: 19 }
    ));
  }
}
