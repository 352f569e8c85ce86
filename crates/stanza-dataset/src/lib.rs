//! Synthetic-dataset codec for the Stanza occupancy store.
//!
//! Two halves, mirroring the import file's lifecycle: generation
//! ([`generate::ensure_dataset`]) writes the deterministic occupancy calendar
//! once, and validation ([`validate::load_and_validate`]) strictly re-reads
//! it before any row reaches storage. An existing file is always the source
//! of truth; validation fails closed with the offending line number.

pub mod error;
pub mod generate;
pub mod validate;

pub use error::{Error, Result};
pub use generate::{DatasetFile, ensure_dataset, generate_rows};
pub use validate::load_and_validate;
