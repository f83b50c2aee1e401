//! Research and judgment collaborator ports.
//!
//! Both collaborators are opaque text producers: they receive a question and
//! return free text. Structure is imposed by the application layer.

use async_trait::async_trait;

use crate::domain::market::MarketRecord;
use crate::domain::research::ResearchFinding;
use crate::error::CollaboratorError;

/// Gathers outside information about a market question.
#[async_trait]
pub trait Researcher: Send + Sync {
    fn name(&self) -> &'static str;

    /// Research `question` within `topic` and return the collaborator's text.
    async fn research(&self, topic: &str, question: &str) -> Result<String, CollaboratorError>;
}

/// Estimates a market's true probability from research findings.
#[async_trait]
pub trait Judge: Send + Sync {
    fn name(&self) -> &'static str;

    /// Judge `market` given `findings` and return the collaborator's text.
    async fn judge(
        &self,
        market: &MarketRecord,
        findings: &ResearchFinding,
    ) -> Result<String, CollaboratorError>;
}
