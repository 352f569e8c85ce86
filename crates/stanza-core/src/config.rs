//! Immutable runtime configuration.
//!
//! A [`Config`] is constructed once at process start and handed to every
//! component by constructor injection — there is no cached global lookup.
//! [`Config::load`] layers an optional file source under `STANZA`-prefixed
//! environment variables and validates the result before returning it.

use std::{
  ops::RangeInclusive,
  path::{Path, PathBuf},
};

use chrono::NaiveDate;
use serde::Deserialize;

use crate::{Error, Result};

/// Acceptable band for the weekday occupied-probability knob.
pub const WEEKDAY_OCCUPIED_BAND: RangeInclusive<f64> = 0.65..=0.75;

/// Acceptable band for the weekend occupied-probability knob.
pub const WEEKEND_OCCUPIED_BAND: RangeInclusive<f64> = 0.30..=0.40;

// ─── Config ──────────────────────────────────────────────────────────────────

/// Resolved runtime parameters for the occupancy store.
///
/// The `prediction` and `allocation` sections are carried for the external
/// collaborators that consume this store; apart from
/// `prediction.default_occupancy_probability` their semantics are not
/// interpreted here.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Directory holding the database file and the synthetic dataset.
  pub data_dir:      PathBuf,
  pub database_file: String,
  pub dataset_file:  String,

  pub synthetic:  SyntheticConfig,
  pub prediction: PredictionConfig,
  pub allocation: AllocationConfig,
}

/// Knobs for deterministic synthetic-history generation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
  /// Number of calendar days of history to generate.
  pub seed_days:                    u32,
  /// Ordered slot list; doubles as the import validator's slot vocabulary.
  pub time_slots:                   Vec<String>,
  pub weekday_occupied_probability: f64,
  pub weekend_occupied_probability: f64,
  /// Seed for the deterministic draw sequence.
  pub seed:                         u64,
  /// Generated dates end the day before this date.
  pub reference_end_date:           NaiveDate,
}

/// Tuning parameters consumed by the external idle-probability predictor.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
  pub rolling_window_days:           u32,
  /// Fallback returned by `global_occupancy_frequency` on empty history.
  pub default_occupancy_probability: f64,
  pub min_training_rows:             u32,
  pub model_max_iter:                u32,
}

/// Tuning parameters consumed by the external allocation optimizer and
/// demand forecaster.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
  pub idle_probability_threshold: f64,
  pub stakeholder_usage_cap:      f64,
  pub solver_max_time_seconds:    u32,
  pub forecast_history_days:      u32,
}

// ─── Defaults ────────────────────────────────────────────────────────────────

impl Default for Config {
  fn default() -> Self {
    Self {
      data_dir:      PathBuf::from("data"),
      database_file: "stanza.db".to_owned(),
      dataset_file:  "synthetic_dataset.csv".to_owned(),
      synthetic:     SyntheticConfig::default(),
      prediction:    PredictionConfig::default(),
      allocation:    AllocationConfig::default(),
    }
  }
}

impl Default for SyntheticConfig {
  fn default() -> Self {
    Self {
      seed_days:                    21,
      time_slots:                   ["09-11", "11-13", "14-16", "16-18"]
        .map(str::to_owned)
        .to_vec(),
      weekday_occupied_probability: 0.65,
      weekend_occupied_probability: 0.35,
      seed:                         42,
      reference_end_date:           NaiveDate::from_ymd_opt(2026, 2, 21)
        .expect("literal date is valid"),
    }
  }
}

impl Default for PredictionConfig {
  fn default() -> Self {
    Self {
      rolling_window_days:           7,
      default_occupancy_probability: 0.5,
      min_training_rows:             20,
      model_max_iter:                500,
    }
  }
}

impl Default for AllocationConfig {
  fn default() -> Self {
    Self {
      idle_probability_threshold: 0.50,
      stakeholder_usage_cap:      0.50,
      solver_max_time_seconds:    10,
      forecast_history_days:      30,
    }
  }
}

// ─── Loading & validation ────────────────────────────────────────────────────

impl Config {
  /// Load configuration from an optional file with `STANZA`-prefixed
  /// environment variables layered on top, then [`validate`](Self::validate).
  ///
  /// Nested fields use `__` as the environment separator, e.g.
  /// `STANZA__SYNTHETIC__SEED_DAYS=14`.
  pub fn load(file: Option<&Path>) -> Result<Self> {
    let mut builder = config::Config::builder();
    if let Some(path) = file {
      builder = builder.add_source(config::File::from(path).required(false));
    }
    let settings = builder
      .add_source(config::Environment::with_prefix("STANZA").separator("__"))
      .build()?;

    let cfg: Self = settings.try_deserialize()?;
    cfg.validate()?;
    Ok(cfg)
  }

  /// Check the generation and probability knobs. Every violation is fatal
  /// and is reported before any file or database I/O happens.
  pub fn validate(&self) -> Result<()> {
    let synthetic = &self.synthetic;

    if synthetic.seed_days == 0 {
      return Err(Error::NonPositiveSeedDays);
    }
    if synthetic.time_slots.is_empty() {
      return Err(Error::EmptyTimeSlots);
    }
    if !WEEKDAY_OCCUPIED_BAND.contains(&synthetic.weekday_occupied_probability) {
      return Err(Error::WeekdayProbabilityOutOfBand {
        value: synthetic.weekday_occupied_probability,
        low:   *WEEKDAY_OCCUPIED_BAND.start(),
        high:  *WEEKDAY_OCCUPIED_BAND.end(),
      });
    }
    if !WEEKEND_OCCUPIED_BAND.contains(&synthetic.weekend_occupied_probability) {
      return Err(Error::WeekendProbabilityOutOfBand {
        value: synthetic.weekend_occupied_probability,
        low:   *WEEKEND_OCCUPIED_BAND.start(),
        high:  *WEEKEND_OCCUPIED_BAND.end(),
      });
    }

    let default_p = self.prediction.default_occupancy_probability;
    if !(0.0..=1.0).contains(&default_p) {
      return Err(Error::DefaultProbabilityOutOfRange(default_p));
    }

    Ok(())
  }

  pub fn database_path(&self) -> PathBuf {
    self.data_dir.join(&self.database_file)
  }

  pub fn dataset_path(&self) -> PathBuf { self.data_dir.join(&self.dataset_file) }
}
