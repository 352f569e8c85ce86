//! Core types and trait definitions for the Stanza occupancy store.
//!
//! This crate is deliberately free of database dependencies. All other
//! crates depend on it; downstream prediction/allocation/forecast
//! collaborators see storage only through [`store::OccupancyStore`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod booking;
pub mod config;
pub mod error;
pub mod outcome;
pub mod request;
pub mod room;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
