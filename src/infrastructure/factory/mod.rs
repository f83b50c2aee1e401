//! Factory modules for building infrastructure components.
//!
//! Provides factory functions that construct fully-configured components
//! from application configuration. These factories handle dependency
//! injection and wiring.
//!
//! # Submodules
//!
//! - [`llm`] - Judgment and research LLM clients
//! - [`notifier`] - Notification sink registry
//! - [`persistence`] - Database, seen-market store and report stores
//! - [`pipeline`] - Pipeline composition for live and dry runs

pub mod llm;
pub mod notifier;
pub mod persistence;
pub mod pipeline;

#[cfg(test)]
mod tests;
