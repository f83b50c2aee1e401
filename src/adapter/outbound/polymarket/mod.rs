//! Polymarket market discovery via the Gamma API.

pub mod client;
pub mod dto;
pub mod settings;

pub use client::PolymarketClient;
pub use settings::{HttpConfig, ScanConfig};
