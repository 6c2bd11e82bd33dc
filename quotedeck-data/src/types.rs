/// Core data types for the QuoteDeck data-plane
///
/// These types are the canonical records exchanged between the ingestion
/// path, the state store and the projection layer.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Number of points in a synthesised 7-day price path (one per hour).
pub const SPARKLINE_LEN: usize = 168;

/// One row of current market state for a tracked asset.
///
/// Exactly one `AssetRecord` exists per tracked symbol after the first
/// successful tick for that symbol. The record is owned and mutated by the
/// [`StateStore`](crate::store::StateStore); everything else works on clones.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AssetRecord {
    /// Uppercase base ticker, unique key (e.g. "BTC")
    pub symbol: SmolStr,
    /// Human-readable asset name (e.g. "Bitcoin")
    pub name: SmolStr,
    /// Last traded price, quote-denominated
    pub price: f64,
    /// Signed 1-hour change percentage (derived, see normalizer)
    pub change_1h: f64,
    /// Signed 24-hour change percentage (native feed figure)
    pub change_24h: f64,
    /// Signed 7-day change percentage (derived, see normalizer)
    pub change_7d: f64,
    /// Market capitalisation: price x circulating supply
    pub market_cap: f64,
    /// 24-hour traded volume, quote-denominated
    pub volume_24h: f64,
    /// Circulating supply in base units
    pub circulating_supply: f64,
    /// Maximum supply in base units, absent for uncapped assets
    pub max_supply: Option<f64>,
    /// Synthesised week-long hourly price path, [`SPARKLINE_LEN`] points
    pub sparkline_7d: Vec<f64>,
}

/// One OHLC candle over a fixed time interval.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Bar {
    /// Candle open time, seconds since epoch
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    /// A bar is usable only if all four OHLC fields are simultaneously
    /// positive; anything else is dropped at the conversion boundary.
    pub fn is_valid(&self) -> bool {
        self.open > 0.0 && self.high > 0.0 && self.low > 0.0 && self.close > 0.0
    }

    /// Open time as a UTC timestamp.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.time, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_validity() {
        let bar = Bar {
            time: 1_700_000_000,
            open: 100.0,
            high: 105.0,
            low: 99.0,
            close: 102.0,
        };
        assert!(bar.is_valid());

        let zero_low = Bar { low: 0.0, ..bar };
        assert!(!zero_low.is_valid());

        let negative_close = Bar { close: -1.0, ..bar };
        assert!(!negative_close.is_valid());
    }

    #[test]
    fn test_bar_datetime() {
        let bar = Bar {
            time: 1_700_000_000,
            open: 1.0,
            high: 1.0,
            low: 1.0,
            close: 1.0,
        };
        let datetime = bar.datetime().unwrap();
        assert_eq!(datetime.timestamp(), 1_700_000_000);
    }
}
