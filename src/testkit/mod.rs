//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] - Builders for markets, findings, judgments and reports.
//! - [`collaborator`] - Scripted [`MarketProvider`](crate::port::MarketProvider),
//!   [`Researcher`](crate::port::Researcher), [`Judge`](crate::port::Judge),
//!   [`Llm`](crate::port::Llm) and sink implementations, plus a wired
//!   in-memory pipeline.

pub mod collaborator;
pub mod domain;
