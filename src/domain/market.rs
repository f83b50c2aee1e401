//! Market snapshot taken at scan time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::MarketId;

const MARKET_BASE_URL: &str = "https://polymarket.com";

/// Trading status of a listed market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketStatus {
    Open,
    Closed,
}

/// One listed market as seen by a single scan.
///
/// Records are immutable snapshots: the pipeline creates them from the
/// provider response and drops them at the end of the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRecord {
    pub id: MarketId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub slug: Option<String>,
    /// Available liquidity in USD.
    pub liquidity: f64,
    /// Trading volume over the last 24 hours in USD.
    pub volume_24h: f64,
    /// Market-implied probability of the YES outcome, in `[0, 1]`.
    pub implied_probability: f64,
    pub status: MarketStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

impl MarketRecord {
    /// Create an open market with the fields every stage needs.
    ///
    /// The implied probability is clamped into `[0, 1]`.
    pub fn new(
        id: impl Into<MarketId>,
        title: impl Into<String>,
        liquidity: f64,
        volume_24h: f64,
        implied_probability: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            slug: None,
            liquidity,
            volume_24h,
            implied_probability: implied_probability.clamp(0.0, 1.0),
            status: MarketStatus::Open,
            tags: Vec::new(),
            end_date: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: MarketStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_end_date(mut self, end_date: DateTime<Utc>) -> Self {
        self.end_date = Some(end_date);
        self
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == MarketStatus::Open
    }

    /// Fractional days between `now` and the end date, negative once past.
    #[must_use]
    pub fn days_to_resolution(&self, now: DateTime<Utc>) -> Option<f64> {
        self.end_date
            .map(|end| (end - now).num_seconds() as f64 / 86_400.0)
    }

    /// Link to the market page on the venue.
    #[must_use]
    pub fn url(&self) -> String {
        match self.slug.as_deref() {
            Some(slug) if !slug.is_empty() => format!("{MARKET_BASE_URL}/event/{slug}"),
            _ => format!("{MARKET_BASE_URL}/market/{}", self.id),
        }
    }

    /// Title, description and tags lowercased into one searchable string.
    #[must_use]
    pub fn search_text(&self) -> String {
        let mut text = format!("{} {}", self.title, self.description);
        for tag in &self.tags {
            text.push(' ');
            text.push_str(tag);
        }
        text.to_lowercase()
    }

    /// Whether any tag matches one of the given lowercase names.
    #[must_use]
    pub fn has_tag(&self, names: &[&str]) -> bool {
        self.tags
            .iter()
            .any(|tag| names.contains(&tag.to_lowercase().as_str()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn new_clamps_probability() {
        assert_eq!(MarketRecord::new("m", "t", 0.0, 0.0, 1.4).implied_probability, 1.0);
        assert_eq!(MarketRecord::new("m", "t", 0.0, 0.0, -0.2).implied_probability, 0.0);
    }

    #[test]
    fn url_prefers_slug() {
        let market = MarketRecord::new("0xabc", "t", 0.0, 0.0, 0.5).with_slug("fed-cut");
        assert_eq!(market.url(), "https://polymarket.com/event/fed-cut");
    }

    #[test]
    fn url_falls_back_to_id() {
        let market = MarketRecord::new("0xabc", "t", 0.0, 0.0, 0.5);
        assert_eq!(market.url(), "https://polymarket.com/market/0xabc");
    }

    #[test]
    fn days_to_resolution_is_fractional() {
        let now = Utc::now();
        let market =
            MarketRecord::new("m", "t", 0.0, 0.0, 0.5).with_end_date(now + Duration::hours(36));
        let days = market.days_to_resolution(now).unwrap();
        assert!((days - 1.5).abs() < 1e-6);
    }

    #[test]
    fn days_to_resolution_unknown_without_end_date() {
        let market = MarketRecord::new("m", "t", 0.0, 0.0, 0.5);
        assert!(market.days_to_resolution(Utc::now()).is_none());
    }

    #[test]
    fn search_text_includes_tags_lowercased() {
        let market = MarketRecord::new("m", "Will the FED cut?", 0.0, 0.0, 0.5)
            .with_description("Rates decision")
            .with_tags(["Economy"]);
        let text = market.search_text();
        assert!(text.contains("fed"));
        assert!(text.contains("rates decision"));
        assert!(text.contains("economy"));
    }

    #[test]
    fn has_tag_ignores_case() {
        let market = MarketRecord::new("m", "t", 0.0, 0.0, 0.5).with_tags(["Crypto"]);
        assert!(market.has_tag(&["crypto"]));
        assert!(!market.has_tag(&["sports"]));
    }
}
