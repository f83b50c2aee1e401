//! Venue-agnostic domain types for opportunity evaluation.

pub mod error;
pub mod id;
pub mod judgment;
pub mod market;
pub mod opportunity;
pub mod prediction;
pub mod report;
pub mod research;
pub mod seen;
pub mod worthiness;

pub use id::{MarketId, RunId};
pub use judgment::{Confidence, Decision, Judgment};
pub use market::{MarketRecord, MarketStatus};
pub use opportunity::{Opportunity, OpportunityWeights};
pub use prediction::{PredictionOutcome, PredictionRecord};
pub use report::{NotificationEntry, NotificationPayload, RunReport, RunStats};
pub use research::{Evidence, ResearchFinding, SourceQuality};
pub use seen::SeenMarket;
pub use worthiness::{Priority, WorthinessFactors, WorthinessScore, WorthinessWeights};
