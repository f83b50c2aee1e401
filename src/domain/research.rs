//! Research findings gathered for a market.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::MarketId;

/// Upper bound on items kept per evidence list.
pub const MAX_EVIDENCE_ITEMS: usize = 20;

/// Self-reported quality of the sources behind a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceQuality {
    High,
    Medium,
    Low,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Structured evidence extracted from a research response.
///
/// Every list is capped at [`MAX_EVIDENCE_ITEMS`] entries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Evidence {
    #[serde(default)]
    pub recent_developments: Vec<String>,
    #[serde(default)]
    pub evidence_yes: Vec<String>,
    #[serde(default)]
    pub evidence_no: Vec<String>,
    #[serde(default)]
    pub official_signals: Vec<String>,
    #[serde(default)]
    pub timeline_constraints: Vec<String>,
    #[serde(default)]
    pub source_quality: SourceQuality,
}

impl Evidence {
    /// Truncate every list to the configured maximum.
    #[must_use]
    pub fn capped(mut self) -> Self {
        for list in [
            &mut self.recent_developments,
            &mut self.evidence_yes,
            &mut self.evidence_no,
            &mut self.official_signals,
            &mut self.timeline_constraints,
        ] {
            list.truncate(MAX_EVIDENCE_ITEMS);
        }
        self
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.recent_developments.len()
            + self.evidence_yes.len()
            + self.evidence_no.len()
            + self.official_signals.len()
            + self.timeline_constraints.len()
    }
}

/// Output of the research collaborator for one market.
///
/// Owned by the pipeline run and consumed once by the judgment stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchFinding {
    pub market_id: MarketId,
    /// Question sent to the collaborator.
    pub query: String,
    /// Raw text returned.
    pub text: String,
    /// Parsed evidence when the text carried the expected JSON shape.
    pub evidence: Option<Evidence>,
    pub provider: String,
    pub gathered_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_source_quality_deserializes_as_unknown() {
        let evidence: Evidence =
            serde_json::from_str(r#"{"source_quality": "excellent"}"#).unwrap();
        assert_eq!(evidence.source_quality, SourceQuality::Unknown);
    }

    #[test]
    fn capped_truncates_lists() {
        let evidence = Evidence {
            evidence_yes: (0..30).map(|i| format!("item {i}")).collect(),
            ..Default::default()
        }
        .capped();
        assert_eq!(evidence.evidence_yes.len(), MAX_EVIDENCE_ITEMS);
        assert_eq!(evidence.item_count(), MAX_EVIDENCE_ITEMS);
    }
}
