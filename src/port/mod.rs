//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture.
//! Adapters implement them to integrate with the market venue, AI
//! providers, storage and notification channels.
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │                         │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              │                         │              │
//!     │              └─────────────────────────┘              │
//!     │                         │                             │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │ Market  │            │   Store     │              │   Sink    │
//! │ LLM     │            │   Adapter   │              │  Adapter  │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`MarketProvider`] - Market listings
//! - [`Llm`], [`Researcher`], [`Judge`] - AI collaborators
//! - [`NotificationSink`] - Telegram, logging
//! - [`SeenMarketStore`] - Cooldown record
//! - [`ReportStore`], [`RunLogReader`] - Run reports
//! - [`PredictionLog`], [`PredictionReader`] - Judgment history

pub mod outbound;

pub use outbound::llm::Llm;
pub use outbound::market::MarketProvider;
pub use outbound::notifier::{Delivery, NotificationSink, NullSink, SinkRegistry};
pub use outbound::prediction::{PredictionLog, PredictionReader};
pub use outbound::report::{PersistedReport, ReportStore, RunLogReader, RunSummary};
pub use outbound::research::{Judge, Researcher};
pub use outbound::store::SeenMarketStore;
