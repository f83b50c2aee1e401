//! Judgment history for one run.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::ranking::RankOutcome;
use crate::domain::id::{MarketId, RunId};
use crate::domain::judgment::Judgment;
use crate::domain::market::MarketRecord;
use crate::domain::prediction::{PredictionOutcome, PredictionRecord};
use crate::domain::research::ResearchFinding;

/// One record per judged market, in judgment order.
///
/// The outcome comes from `ranked`; judged markets it does not list were
/// dropped before ranking, either as abstentions or for a small edge.
#[must_use]
pub fn prediction_records(
    run_id: &RunId,
    judged: &[(MarketRecord, Judgment)],
    researched: &[(MarketRecord, ResearchFinding)],
    ranked: &RankOutcome,
    now: DateTime<Utc>,
) -> Vec<PredictionRecord> {
    let mut outcomes: HashMap<&MarketId, PredictionOutcome> = HashMap::new();
    for (list, outcome) in [
        (&ranked.reported, PredictionOutcome::Reported),
        (&ranked.suppressed, PredictionOutcome::Suppressed),
        (&ranked.truncated, PredictionOutcome::Truncated),
    ] {
        for opp in list {
            outcomes.insert(&opp.market().id, outcome);
        }
    }
    let notes: HashMap<&MarketId, &str> = researched
        .iter()
        .map(|(market, finding)| (&market.id, finding.text.as_str()))
        .collect();

    judged
        .iter()
        .map(|(market, judgment)| {
            let outcome = outcomes.get(&market.id).copied().unwrap_or(if judgment.is_abstain() {
                PredictionOutcome::Abstained
            } else {
                PredictionOutcome::BelowThreshold
            });
            let record = PredictionRecord::new(run_id.clone(), market, judgment, outcome, now);
            match notes.get(&market.id) {
                Some(text) => record.with_research(text),
                None => record,
            }
        })
        .collect()
}
