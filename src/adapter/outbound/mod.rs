//! Outbound adapters (driven side).

pub mod inference;
pub mod llm;
pub mod memory;
pub mod notifier;
pub mod polymarket;
pub mod report;
pub mod sqlite;
