//! SQLite persistence adapters.
//!
//! Provides the seen-market cooldown store, the run log and the judgment
//! history using Diesel ORM.

pub mod database;
pub mod prediction;
pub mod run_log;
pub mod seen;

pub use database::connection::{open, DbPool};
pub use prediction::SqlitePredictionLog;
pub use run_log::SqliteRunLog;
pub use seen::SqliteSeenStore;
