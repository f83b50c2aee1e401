//! Gamma API response types.
//!
//! The Gamma API returns a flat JSON array of markets. Numeric fields arrive
//! as numbers or as decimal strings depending on the endpoint version, and
//! the outcome arrays are sometimes JSON-encoded strings. The types here
//! accept both shapes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::domain::market::{MarketRecord, MarketStatus};

/// Market data from the Gamma API.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GammaMarket {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub condition_id: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub closed: bool,
    #[serde(default, alias = "end_date", deserialize_with = "flexible_datetime")]
    pub end_date: Option<DateTime<Utc>>,
    /// Outcome names, e.g. `["Yes", "No"]`, possibly JSON-encoded.
    #[serde(default)]
    pub outcomes: Option<Value>,
    /// Outcome prices aligned with `outcomes`, possibly JSON-encoded.
    #[serde(default)]
    pub outcome_prices: Option<Value>,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub best_bid: Option<f64>,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub best_ask: Option<f64>,
    #[serde(default, alias = "volume24h", deserialize_with = "flexible_f64")]
    pub volume_24hr: Option<f64>,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub liquidity: Option<f64>,
}

impl GammaMarket {
    /// Outcome names.
    pub fn outcome_names(&self) -> Vec<String> {
        decode_list(self.outcomes.as_ref(), &self.id, "outcomes")
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect()
    }

    /// Outcome prices, aligned with [`outcome_names`](Self::outcome_names).
    pub fn outcome_prices(&self) -> Vec<f64> {
        decode_list(self.outcome_prices.as_ref(), &self.id, "outcome_prices")
            .iter()
            .filter_map(number)
            .collect()
    }

    /// Probability of YES implied by the current price.
    ///
    /// Uses the price of the "Yes" outcome (or the first outcome when no
    /// outcome is named "Yes"), then the bid/ask midpoint, then 0.5.
    pub fn implied_probability(&self) -> f64 {
        let names = self.outcome_names();
        let prices = self.outcome_prices();
        let yes_index = names
            .iter()
            .position(|n| n.eq_ignore_ascii_case("yes"))
            .unwrap_or(0);

        if let Some(price) = prices.get(yes_index) {
            return price.clamp(0.0, 1.0);
        }
        match (self.best_bid, self.best_ask) {
            (Some(bid), Some(ask)) => ((bid + ask) / 2.0).clamp(0.0, 1.0),
            _ => 0.5,
        }
    }
}

impl From<GammaMarket> for MarketRecord {
    fn from(m: GammaMarket) -> Self {
        let implied = m.implied_probability();
        let status = if m.active && !m.closed {
            MarketStatus::Open
        } else {
            MarketStatus::Closed
        };
        let title = m.question.unwrap_or_else(|| "Unknown Market".to_string());

        let mut record = MarketRecord::new(
            m.id,
            title,
            m.liquidity.unwrap_or(0.0),
            m.volume_24hr.unwrap_or(0.0),
            implied,
        )
        .with_status(status)
        .with_description(m.description.unwrap_or_default())
        .with_tags(m.category.into_iter().filter(|c| !c.is_empty()));

        if let Some(slug) = m.slug.filter(|s| !s.is_empty()) {
            record = record.with_slug(slug);
        }
        if let Some(end) = m.end_date {
            record = record.with_end_date(end);
        }
        record
    }
}

fn decode_list(value: Option<&Value>, id: &str, field: &str) -> Vec<Value> {
    match value {
        Some(Value::Array(items)) => items.clone(),
        Some(Value::String(raw)) => serde_json::from_str::<Vec<Value>>(raw)
            .map_err(|e| {
                debug!(error = %e, raw = %raw, market_id = %id, field, "Failed to decode list");
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn flexible_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number))
}

/// RFC 3339 timestamps or bare `YYYY-MM-DD` dates; anything else is `None`.
fn flexible_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }
    Ok(NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc()))
}

fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("unexpected market id: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_string_encoded_fields() {
        let json = r#"{
            "id": "512345",
            "conditionId": "0xabc",
            "question": "Will X happen?",
            "slug": "will-x-happen",
            "category": "Politics",
            "active": true,
            "closed": false,
            "endDate": "2030-01-01T00:00:00Z",
            "outcomes": "[\"Yes\", \"No\"]",
            "outcomePrices": "[\"0.65\", \"0.35\"]",
            "volume24hr": "8456.03",
            "liquidity": 14854.96
        }"#;
        let market: GammaMarket = serde_json::from_str(json).unwrap();

        assert_eq!(market.outcome_names(), vec!["Yes", "No"]);
        assert!((market.implied_probability() - 0.65).abs() < 1e-9);
        assert!((market.volume_24hr.unwrap() - 8456.03).abs() < 0.01);

        let record = MarketRecord::from(market);
        assert_eq!(record.id.as_str(), "512345");
        assert!(record.is_open());
        assert_eq!(record.tags, vec!["Politics".to_string()]);
        assert_eq!(record.url(), "https://polymarket.com/event/will-x-happen");
        assert!(record.end_date.is_some());
    }

    #[test]
    fn numeric_id_and_native_arrays_are_accepted() {
        let json = r#"{"id": 42, "outcomes": ["No", "Yes"], "outcomePrices": [0.8, 0.2]}"#;
        let market: GammaMarket = serde_json::from_str(json).unwrap();
        assert_eq!(market.id, "42");
        assert!((market.implied_probability() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn falls_back_to_midpoint_then_even_odds() {
        let market = GammaMarket {
            id: "m".into(),
            best_bid: Some(0.30),
            best_ask: Some(0.40),
            ..Default::default()
        };
        assert!((market.implied_probability() - 0.35).abs() < 1e-9);

        let bare = GammaMarket {
            id: "m".into(),
            ..Default::default()
        };
        assert_eq!(bare.implied_probability(), 0.5);
    }

    #[test]
    fn closed_or_inactive_markets_map_to_closed() {
        let closed = GammaMarket {
            id: "c".into(),
            active: true,
            closed: true,
            ..Default::default()
        };
        assert!(!MarketRecord::from(closed).is_open());

        let inactive = GammaMarket {
            id: "i".into(),
            ..Default::default()
        };
        assert!(!MarketRecord::from(inactive).is_open());
    }

    #[test]
    fn date_only_end_date_is_accepted() {
        let json = r#"{"id": "d", "endDate": "2030-06-01"}"#;
        let market: GammaMarket = serde_json::from_str(json).unwrap();
        assert!(market.end_date.is_some());

        let json = r#"{"id": "d", "endDate": "soon"}"#;
        let market: GammaMarket = serde_json::from_str(json).unwrap();
        assert!(market.end_date.is_none());
    }

    #[test]
    fn invalid_encoded_list_is_empty() {
        let market = GammaMarket {
            id: "bad".into(),
            outcomes: Some(Value::String("not json".into())),
            ..Default::default()
        };
        assert!(market.outcome_names().is_empty());
    }
}
