//! Data-plane configuration.

use smol_str::SmolStr;

/// Default live ticker stream endpoint.
pub const DEFAULT_STREAM_URL: &str = "wss://stream.binance.com:9443/ws";

/// Default REST endpoint for historical bars.
pub const DEFAULT_REST_URL: &str = "https://api.binance.com";

/// Quote asset appended to every tracked market symbol.
pub const DEFAULT_QUOTE: &str = "USDT";

/// Configuration for a [`Dashboard`](crate::dashboard::Dashboard).
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Websocket endpoint of the live ticker feed
    pub stream_url: String,
    /// REST endpoint serving klines-style historical bars
    pub rest_url: String,
    /// Tracked base symbols
    pub symbols: Vec<SmolStr>,
    /// Quote asset suffix of every market symbol
    pub quote: SmolStr,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            stream_url: DEFAULT_STREAM_URL.to_string(),
            rest_url: DEFAULT_REST_URL.to_string(),
            symbols: ["BTC", "ETH", "BNB", "XRP", "ADA"]
                .into_iter()
                .map(SmolStr::new)
                .collect(),
            quote: SmolStr::new(DEFAULT_QUOTE),
        }
    }
}

impl DashboardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the live stream endpoint
    pub fn with_stream_url(mut self, url: impl Into<String>) -> Self {
        self.stream_url = url.into();
        self
    }

    /// Set the historical bars REST endpoint
    pub fn with_rest_url(mut self, url: impl Into<String>) -> Self {
        self.rest_url = url.into();
        self
    }

    /// Replace the tracked symbol set
    pub fn with_symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        self.symbols = symbols.into_iter().map(Into::into).collect();
        self
    }

    /// Set the quote asset suffix
    pub fn with_quote(mut self, quote: impl Into<SmolStr>) -> Self {
        self.quote = quote.into();
        self
    }

    /// Ticker channel names for the subscribe frame, one per tracked symbol.
    pub fn ticker_channels(&self) -> Vec<String> {
        self.symbols
            .iter()
            .map(|symbol| {
                format!(
                    "{}{}@ticker",
                    symbol.to_lowercase(),
                    self.quote.to_lowercase()
                )
            })
            .collect()
    }
}
