//! SQLite backend for the Stanza occupancy store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. Besides the
//! [`stanza_core::store::OccupancyStore`] implementation this crate owns the
//! schema lifecycle (idempotent DDL plus two startup migrations) and the
//! idempotent bootstrap seeding pipeline.

mod encode;
mod schema;
mod seed;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use seed::SeedReport;
pub use store::SqliteStore;
