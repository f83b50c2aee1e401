//! Implementations of ports (hexagonal adapters).
//!
//! - [`inbound`] drives the application (the CLI).
//! - [`outbound`] is driven by it (market venue, AI providers, storage,
//!   notification).

pub mod inbound;
pub mod outbound;
