//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the pipeline's collaborators: the market
//! venue, AI research and judgment, notification, storage and the
//! judgment history.

pub mod llm;
pub mod market;
pub mod notifier;
pub mod prediction;
pub mod report;
pub mod research;
pub mod store;
