//! Liquidity, volume and status screen over raw market listings.

use serde::Deserialize;

use crate::domain::market::MarketRecord;

/// Thresholds for the market screen.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    /// Minimum liquidity in USD.
    #[serde(default = "default_min_liquidity")]
    pub min_liquidity: f64,
    /// Minimum 24h volume in USD.
    #[serde(default = "default_min_volume_24h")]
    pub min_volume_24h: f64,
}

const fn default_min_liquidity() -> f64 {
    1000.0
}

const fn default_min_volume_24h() -> f64 {
    500.0
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_liquidity: default_min_liquidity(),
            min_volume_24h: default_min_volume_24h(),
        }
    }
}

/// Stateless market screen.
#[derive(Debug, Clone, Default)]
pub struct MarketFilter {
    config: FilterConfig,
}

impl MarketFilter {
    #[must_use]
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Whether a single market passes every threshold.
    #[must_use]
    pub fn is_eligible(&self, market: &MarketRecord) -> bool {
        market.is_open()
            && market.liquidity >= self.config.min_liquidity
            && market.volume_24h >= self.config.min_volume_24h
    }

    /// Keep eligible markets, preserving input order.
    #[must_use]
    pub fn filter(&self, markets: &[MarketRecord]) -> Vec<MarketRecord> {
        markets
            .iter()
            .filter(|m| self.is_eligible(m))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::MarketStatus;

    fn filter() -> MarketFilter {
        MarketFilter::new(FilterConfig {
            min_liquidity: 1000.0,
            min_volume_24h: 500.0,
        })
    }

    #[test]
    fn passes_market_above_thresholds() {
        let market = MarketRecord::new("a", "A", 2000.0, 800.0, 0.5);
        assert!(filter().is_eligible(&market));
    }

    #[test]
    fn excludes_thin_liquidity() {
        let market = MarketRecord::new("b", "B", 200.0, 800.0, 0.5);
        assert!(!filter().is_eligible(&market));
    }

    #[test]
    fn excludes_low_volume() {
        let market = MarketRecord::new("c", "C", 2000.0, 100.0, 0.5);
        assert!(!filter().is_eligible(&market));
    }

    #[test]
    fn excludes_closed_market() {
        let market =
            MarketRecord::new("d", "D", 2000.0, 800.0, 0.5).with_status(MarketStatus::Closed);
        assert!(!filter().is_eligible(&market));
    }

    #[test]
    fn thresholds_are_inclusive() {
        let market = MarketRecord::new("e", "E", 1000.0, 500.0, 0.5);
        assert!(filter().is_eligible(&market));
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(filter().filter(&[]).is_empty());
    }

    #[test]
    fn output_is_ordered_subset_meeting_thresholds() {
        let markets = vec![
            MarketRecord::new("1", "one", 5000.0, 900.0, 0.5),
            MarketRecord::new("2", "two", 100.0, 900.0, 0.5),
            MarketRecord::new("3", "three", 3000.0, 600.0, 0.5),
            MarketRecord::new("4", "four", 3000.0, 50.0, 0.5),
            MarketRecord::new("5", "five", 1500.0, 700.0, 0.5).with_status(MarketStatus::Closed),
            MarketRecord::new("6", "six", 1200.0, 501.0, 0.5),
        ];

        let kept = filter().filter(&markets);
        let ids: Vec<_> = kept.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3", "6"]);

        for market in &kept {
            assert!(market.liquidity >= 1000.0);
            assert!(market.volume_24h >= 500.0);
            assert!(markets.contains(market));
        }
    }
}
