//! Inbound frame model for the upstream ticker stream.

use crate::de;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Event-type tag carried by 24-hour rolling ticker frames.
pub const TICKER_EVENT: &str = "24hrTicker";

/// Messages received on the ticker stream.
///
/// The subscribe acknowledgement and frames for unrecognised event types are
/// valid JSON but not ticker data; they deserialise to `Ignore` so the read
/// loop can discard them without tearing down the connection.
#[derive(Clone, Debug)]
pub enum TickerMessage {
    Ignore,
    Ticker(Ticker24h),
}

impl<'de> Deserialize<'de> for TickerMessage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;

        match value.get("e") {
            Some(event) if event.as_str() == Some(TICKER_EVENT) => {
                serde_json::from_value::<Ticker24h>(value)
                    .map(TickerMessage::Ticker)
                    .map_err(serde::de::Error::custom)
            }
            _ => Ok(TickerMessage::Ignore),
        }
    }
}

/// ### Raw Payload Examples
/// See docs: <https://developers.binance.com/docs/binance-spot-api-docs/web-socket-streams>
/// ```json
/// {
///     "e": "24hrTicker",
///     "E": 1672515782136,
///     "s": "BTCUSDT",
///     "P": "0.250",
///     "c": "16578.50",
///     "v": "10000.5"
/// }
/// ```
#[derive(Clone, PartialEq, PartialOrd, Debug, Deserialize, Serialize)]
pub struct Ticker24h {
    /// Market symbol with quote suffix (eg. "BTCUSDT")
    #[serde(rename = "s")]
    pub market: String,

    /// Last traded price
    #[serde(alias = "c", deserialize_with = "de::de_str")]
    pub last_price: f64,

    /// 24-hour change percentage
    #[serde(alias = "P", deserialize_with = "de::de_str")]
    pub change_24h: f64,

    /// 24-hour traded volume in base units
    #[serde(alias = "v", deserialize_with = "de::de_str")]
    pub volume_base: f64,
}
