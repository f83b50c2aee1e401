//! Edgescout - AI-judged mispricing scanner for prediction markets.
//!
//! Each run lists open markets, keeps the liquid ones, picks the few most
//! worth researching, has an LLM gather evidence and another judge the
//! probability, then reports the markets where that judgment disagrees
//! with the market price by more than a threshold.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - [`domain`] - Markets, judgments, opportunities and reports; no I/O
//! - [`port`] - Traits for everything the pipeline talks to
//! - [`application`] - Pipeline stages, the pipeline itself and the scheduler
//! - [`adapter`] - Polymarket, LLM, SQLite, file and Telegram implementations,
//!   plus the CLI
//! - [`infrastructure`] - Configuration, wiring and the instance lock
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `telegram` (default) - Telegram notification sink
//! - `testkit` - Scripted collaborators for integration tests
//! - `integration-tests` - Tests that call live APIs
//!
//! # Example
//!
//! ```no_run
//! use edgescout::infrastructure::config::settings::Config;
//! use edgescout::infrastructure::factory::pipeline::{build_pipeline, RunMode};
//!
//! # async fn example() -> edgescout::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! let pipeline = build_pipeline(&config, RunMode::DryRun)?;
//! let outcome = pipeline.run().await?;
//! println!("{} opportunities", outcome.report.opportunities.len());
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
