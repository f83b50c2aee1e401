//! Research-worthiness scorer.
//!
//! Decides which filtered markets merit paid research. Markets are scored
//! with keyword and market-structure heuristics, the ones under the floor
//! are discarded, and the best `max_research` survivors are returned.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::domain::market::MarketRecord;
use crate::domain::worthiness::{
    Priority, WorthinessFactors, WorthinessScore, WorthinessWeights,
};

/// Outcomes that hinge on facts someone can look up.
const HIGH_INFORMATION: &[&str] = &[
    "election", "vote", "poll", "candidate", "president", "senate", "congress", "policy",
    "regulation", "fda", "sec", "approval", "decision", "announcement", "earnings", "revenue",
    "profit", "quarterly", "financial", "launch", "release", "product", "trial", "court",
    "lawsuit", "verdict", "ruling", "economic", "gdp", "inflation", "unemployment", "rate",
    "sports", "game", "match", "tournament", "championship",
];

const LOW_INFORMATION: &[&str] = &[
    "coin", "flip", "dice", "random", "lottery", "draw", "instant", "immediate",
];

const PUBLIC_SOURCES: &[&str] = &[
    "official", "announcement", "press", "release", "statement", "public", "government",
    "federal", "state", "agency", "company", "corporation", "earnings", "report", "election",
    "poll", "survey", "data", "news", "media", "coverage",
];

const PRIVATE_SOURCES: &[&str] = &[
    "insider", "private", "confidential", "secret", "internal", "leak", "rumor", "speculation",
];

const CHANCE: &[&str] = &[
    "coin", "flip", "dice", "roll", "random", "lottery", "draw", "chance", "luck", "gamble",
    "instant",
];

const SPORTS_TAGS: &[&str] = &["sports", "nfl", "nba", "mlb", "nhl", "soccer"];
const CRYPTO_TAGS: &[&str] = &["crypto", "bitcoin", "ethereum"];

/// Prices this close to 0 or 1 mean the outcome is already known.
const SETTLED_MARGIN: f64 = 0.02;

/// Selection settings for the worthiness stage.
#[derive(Debug, Clone, Deserialize)]
pub struct WorthinessConfig {
    /// Maximum markets passed on to research (K₁).
    #[serde(default = "default_max_research")]
    pub max_research: usize,
    /// Minimum composite score for a market to qualify.
    #[serde(default = "default_min_score")]
    pub min_score: f64,
    /// Markets resolving sooner than this many days do not qualify.
    #[serde(default = "default_min_days")]
    pub min_days_to_resolution: f64,
    /// Markets resolving later than this many days do not qualify.
    #[serde(default = "default_max_days")]
    pub max_days_to_resolution: f64,
}

const fn default_max_research() -> usize {
    10
}

const fn default_min_score() -> f64 {
    0.6
}

const fn default_min_days() -> f64 {
    1.0
}

const fn default_max_days() -> f64 {
    90.0
}

impl Default for WorthinessConfig {
    fn default() -> Self {
        Self {
            max_research: default_max_research(),
            min_score: default_min_score(),
            min_days_to_resolution: default_min_days(),
            max_days_to_resolution: default_max_days(),
        }
    }
}

/// A market paired with its worthiness verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMarket {
    pub market: MarketRecord,
    pub worthiness: WorthinessScore,
}

/// Heuristic research-worthiness classifier.
#[derive(Debug, Clone, Default)]
pub struct WorthinessScorer {
    config: WorthinessConfig,
    weights: WorthinessWeights,
}

impl WorthinessScorer {
    #[must_use]
    pub fn new(config: WorthinessConfig) -> Self {
        Self {
            config,
            weights: WorthinessWeights::default(),
        }
    }

    #[must_use]
    pub fn with_weights(mut self, weights: WorthinessWeights) -> Self {
        self.weights = weights;
        self
    }

    #[must_use]
    pub fn config(&self) -> &WorthinessConfig {
        &self.config
    }

    /// Score every market and return the top qualifying ones.
    ///
    /// Sorted by score descending, then 24h volume descending, then market
    /// identifier ascending. Never returns more than `max_research` entries
    /// and never pads with markets under the floor.
    #[must_use]
    pub fn select(&self, markets: &[MarketRecord], now: DateTime<Utc>) -> Vec<ScoredMarket> {
        let mut scored: Vec<ScoredMarket> = markets
            .iter()
            .map(|market| ScoredMarket {
                worthiness: self.score(market, now),
                market: market.clone(),
            })
            .filter(|s| {
                if !s.worthiness.qualifies {
                    debug!(
                        market_id = %s.market.id,
                        summary = %s.worthiness.summary(),
                        "Market not research-worthy"
                    );
                }
                s.worthiness.qualifies
            })
            .collect();

        scored.sort_by(compare_scored);
        scored.truncate(self.config.max_research);
        scored
    }

    /// Score a single market.
    #[must_use]
    pub fn score(&self, market: &MarketRecord, now: DateTime<Utc>) -> WorthinessScore {
        let p = market.implied_probability;
        if p <= SETTLED_MARGIN || p >= 1.0 - SETTLED_MARGIN {
            return WorthinessScore::disqualified(format!(
                "price {:.0}% means the outcome is effectively settled",
                p * 100.0
            ));
        }

        let days = market.days_to_resolution(now);
        if matches!(days, Some(d) if d < 0.0) {
            return WorthinessScore::disqualified("resolution date has passed");
        }

        let text = market.search_text();
        let words = tokenize(&text);
        let mut reasons = Vec::new();

        let factors = WorthinessFactors {
            information_dependence: information_dependence(&words, p, days, &mut reasons),
            accessibility: accessibility(&words, market, &mut reasons),
            ambiguity: 1.0 - 2.0 * (p - 0.5).abs(),
            time_sufficiency: time_sufficiency(days),
            efficiency_risk: efficiency_risk(market),
            randomness_risk: randomness_risk(&words, p, days, &mut reasons),
        };

        let score = factors.composite(&self.weights);
        let mut qualifies = score >= self.config.min_score;

        if let Some(d) = days {
            if d < self.config.min_days_to_resolution || d > self.config.max_days_to_resolution {
                qualifies = false;
                reasons.push(format!("resolves in {d:.1} days, outside research window"));
            }
        }

        WorthinessScore {
            factors,
            score,
            priority: Priority::from_score(score),
            qualifies,
            reasons,
        }
    }
}

fn compare_scored(a: &ScoredMarket, b: &ScoredMarket) -> Ordering {
    b.worthiness
        .score
        .total_cmp(&a.worthiness.score)
        .then_with(|| b.market.volume_24h.total_cmp(&a.market.volume_24h))
        .then_with(|| a.market.id.cmp(&b.market.id))
}

fn tokenize(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Count keywords present, accepting a plain plural.
fn hits(words: &[&str], keywords: &[&str]) -> usize {
    keywords
        .iter()
        .filter(|&&kw| {
            words
                .iter()
                .any(|&w| w == kw || w.strip_suffix('s') == Some(kw))
        })
        .count()
}

fn information_dependence(
    words: &[&str],
    p: f64,
    days: Option<f64>,
    reasons: &mut Vec<String>,
) -> f64 {
    let high = hits(words, HIGH_INFORMATION);
    let low = hits(words, LOW_INFORMATION);

    let mut score: f64 = if high >= 2 {
        reasons.push("outcome depends on public information".into());
        0.8
    } else if high == 1 {
        0.6
    } else if low > 0 {
        reasons.push("outcome is not information-driven".into());
        0.2
    } else {
        0.5
    };

    match days {
        Some(d) if d >= 7.0 => score += 0.1,
        Some(d) if d >= 3.0 => score += 0.05,
        Some(_) => score -= 0.1,
        None => {}
    }

    if (0.1..=0.9).contains(&p) {
        score += 0.05;
    }

    score.clamp(0.0, 1.0)
}

fn accessibility(words: &[&str], market: &MarketRecord, reasons: &mut Vec<String>) -> f64 {
    let public = hits(words, PUBLIC_SOURCES);
    let private = hits(words, PRIVATE_SOURCES);

    let mut score: f64 = if public >= 2 {
        0.8
    } else if public == 1 {
        0.6
    } else if private > 0 {
        reasons.push("relevant information is likely private".into());
        0.3
    } else {
        0.5
    };

    if market.liquidity >= 10_000.0 {
        score += 0.1;
    } else if market.liquidity >= 5_000.0 {
        score += 0.05;
    }

    if market.volume_24h >= 1_000.0 {
        score += 0.1;
    } else if market.volume_24h >= 500.0 {
        score += 0.05;
    }

    score.clamp(0.0, 1.0)
}

fn time_sufficiency(days: Option<f64>) -> f64 {
    match days {
        None => 0.5,
        Some(d) if d < 0.0 => 0.0,
        Some(d) if (7.0..=30.0).contains(&d) => 1.0,
        Some(d) if (3.0..7.0).contains(&d) => 0.6 + (d - 3.0) / 4.0 * 0.4,
        Some(d) if d > 30.0 && d <= 90.0 => 1.0 - (d - 30.0) / 60.0 * 0.5,
        Some(d) if (1.0..3.0).contains(&d) => 0.3 + (d - 1.0) / 2.0 * 0.3,
        Some(d) if d > 90.0 => 0.4,
        Some(_) => 0.2,
    }
}

fn efficiency_risk(market: &MarketRecord) -> f64 {
    let liquidity = match market.liquidity {
        l if l >= 50_000.0 => 1.0,
        l if l >= 20_000.0 => 0.75,
        l if l >= 10_000.0 => 0.5,
        l if l >= 5_000.0 => 0.35,
        _ => 0.2,
    };
    let volume = match market.volume_24h {
        v if v >= 5_000.0 => 1.0,
        v if v >= 2_000.0 => 0.65,
        v if v >= 1_000.0 => 0.35,
        _ => 0.0,
    };
    let category = if market.has_tag(SPORTS_TAGS) {
        1.0
    } else if market.has_tag(CRYPTO_TAGS) {
        0.7
    } else {
        0.3
    };

    0.5 * liquidity + 0.3 * volume + 0.2 * category
}

fn randomness_risk(
    words: &[&str],
    p: f64,
    days: Option<f64>,
    reasons: &mut Vec<String>,
) -> f64 {
    let chance = hits(words, CHANCE);
    let mut score: f64 = match chance {
        0 => 0.2,
        1 => 0.5,
        _ => 0.8,
    };

    if chance > 0 {
        reasons.push("outcome is largely chance".into());
        if (0.45..=0.55).contains(&p) {
            score += 0.2;
        }
    }

    match days {
        Some(d) if d < 1.0 => score += 0.3,
        Some(d) if d < 3.0 => score += 0.1,
        _ => {}
    }

    score.clamp(0.0, 1.0)
}
