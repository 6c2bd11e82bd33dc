//! Historical bars fetch path.
//!
//! Maps a coarse timeframe token onto a concrete bar interval and count,
//! issues one point-in-time klines request, and converts the response into
//! canonical [`Bar`]s. Every failure mode resolves to an empty sequence -
//! callers treat empty as "no data", never as an error.

use crate::{
    config::DashboardConfig,
    de,
    transport::HttpFetch,
    types::Bar,
};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::sync::Arc;
use tracing::warn;
use url::Url;

/// Coarse duration token for the historical bars view.
///
/// `Default` is the one-year view (the dashboard's initial timeframe);
/// an unrecognised token maps to the one-month request shape instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Deserialize, Serialize)]
pub enum Timeframe {
    #[display("1m")]
    OneMonth,
    #[display("6m")]
    SixMonths,
    #[default]
    #[display("1y")]
    OneYear,
    #[display("5y")]
    FiveYears,
}

impl Timeframe {
    /// Parse a timeframe token; anything unrecognised falls back to the
    /// one-month shape.
    pub fn from_token(token: &str) -> Self {
        match token {
            "1m" => Timeframe::OneMonth,
            "6m" => Timeframe::SixMonths,
            "1y" => Timeframe::OneYear,
            "5y" => Timeframe::FiveYears,
            _ => Timeframe::OneMonth,
        }
    }

    /// Upstream interval token for one bar.
    pub fn interval(&self) -> &'static str {
        match self {
            Timeframe::OneMonth => "1d",
            Timeframe::SixMonths => "1d",
            Timeframe::OneYear => "1w",
            Timeframe::FiveYears => "1M",
        }
    }

    /// Number of bars requested, ending at the present.
    pub fn bar_limit(&self) -> u32 {
        match self {
            Timeframe::OneMonth => 30,
            Timeframe::SixMonths => 180,
            Timeframe::OneYear => 52,
            Timeframe::FiveYears => 60,
        }
    }
}

/// Issues klines requests through the HTTP-GET capability.
pub struct BarsFetcher {
    http: Arc<dyn HttpFetch>,
    rest_url: String,
    quote: SmolStr,
}

impl BarsFetcher {
    pub fn new(config: &DashboardConfig, http: Arc<dyn HttpFetch>) -> Self {
        Self {
            http,
            rest_url: config.rest_url.clone(),
            quote: config.quote.clone(),
        }
    }

    /// Fetch one timeframe of bars for a symbol.
    ///
    /// Transport failure, a non-success status or an unusable body all
    /// resolve to an empty sequence with a warning at the boundary.
    pub async fn fetch(&self, symbol: &str, timeframe: Timeframe) -> Vec<Bar> {
        let raw = format!(
            "{}/api/v3/klines?symbol={}{}&interval={}&limit={}",
            self.rest_url,
            symbol,
            self.quote,
            timeframe.interval(),
            timeframe.bar_limit(),
        );

        let url = match Url::parse(&raw) {
            Ok(url) => url,
            Err(error) => {
                warn!(%error, url = %raw, "invalid bars url");
                return Vec::new();
            }
        };

        let (status, body) = match self.http.get(&url).await {
            Ok(response) => response,
            Err(error) => {
                warn!(%error, symbol, %timeframe, "bars fetch failed");
                return Vec::new();
            }
        };

        if !(200..300).contains(&status) {
            warn!(status, symbol, %timeframe, "bars fetch returned non-success status");
            return Vec::new();
        }

        let rows: Vec<Vec<serde_json::Value>> = match serde_json::from_slice(&body) {
            Ok(rows) => rows,
            Err(error) => {
                warn!(%error, symbol, %timeframe, "bars response is not a well-formed sequence");
                return Vec::new();
            }
        };

        rows.iter().filter_map(|row| kline_to_bar(row)).collect()
    }
}

/// Convert one klines row into a [`Bar`].
///
/// Index 0 is open-time in milliseconds, indexes 1-4 are OHLC as numeric
/// strings or numbers. Rows without simultaneously positive OHLC are
/// dropped.
fn kline_to_bar(row: &[serde_json::Value]) -> Option<Bar> {
    let bar = Bar {
        time: row.first()?.as_i64()? / 1000,
        open: de::f64_from_value(row.get(1)?)?,
        high: de::f64_from_value(row.get(2)?)?,
        low: de::f64_from_value(row.get(3)?)?,
        close: de::f64_from_value(row.get(4)?)?,
    };
    bar.is_valid().then_some(bar)
}
