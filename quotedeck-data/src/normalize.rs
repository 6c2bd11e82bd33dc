//! Normalisation of raw ticker frames into canonical [`AssetRecord`]s.
//!
//! The upstream feed only carries a native 24-hour change figure; the 1-hour
//! and 7-day figures and the week-long price path are synthesised here.
//! Downstream consumers depend on these exact derivations, approximation
//! error included.

use crate::{
    registry::SymbolRegistry,
    ticker::Ticker24h,
    types::{AssetRecord, SPARKLINE_LEN},
};
use smol_str::SmolStr;
use std::sync::Arc;
use tracing::debug;

/// Turns raw 24-hour ticker payloads into complete asset records.
#[derive(Debug, Clone)]
pub struct Normalizer {
    registry: Arc<SymbolRegistry>,
    /// Quote suffix stripped from market symbols (eg. "USDT")
    quote: SmolStr,
}

impl Normalizer {
    pub fn new(registry: Arc<SymbolRegistry>, quote: impl Into<SmolStr>) -> Self {
        Self {
            registry,
            quote: quote.into(),
        }
    }

    /// Normalise one tick, or `None` if the payload is unusable.
    ///
    /// A bad tick is never fatal: the caller drops it and ingestion
    /// continues.
    pub fn normalize(&self, tick: &Ticker24h) -> Option<AssetRecord> {
        if !tick.last_price.is_finite() || tick.last_price <= 0.0 {
            debug!(market = %tick.market, price = tick.last_price, "dropping tick with invalid price");
            return None;
        }
        if !tick.change_24h.is_finite() || !tick.volume_base.is_finite() {
            debug!(market = %tick.market, "dropping tick with non-finite fields");
            return None;
        }

        let symbol = tick
            .market
            .strip_suffix(self.quote.as_str())
            .unwrap_or(&tick.market);
        let info = self.registry.lookup(symbol);

        Some(AssetRecord {
            symbol: SmolStr::new(symbol),
            name: info.name,
            price: tick.last_price,
            // The feed has no native 1h figure; linear approximation
            change_1h: tick.change_24h / 24.0,
            change_24h: tick.change_24h,
            // No native 7d figure either; heuristic extrapolation
            change_7d: tick.change_24h * 1.5,
            market_cap: tick.last_price * info.circulating_supply,
            // `v` is base-denominated; convert to a quote figure
            volume_24h: tick.volume_base * tick.last_price,
            circulating_supply: info.circulating_supply,
            max_supply: info.max_supply,
            sparkline_7d: synth_price_path(tick.last_price, tick.change_24h),
        })
    }
}

/// Per-step random perturbation bound: +-2.5% of the running price.
const STEP_VOLATILITY: f64 = 0.05;

/// Synthesise a week of hourly prices terminating near the current price.
///
/// Walks forward from the implied week-open price, applying a trend term that
/// linearly ramps from zero to the full 24h change magnitude in the direction
/// of its sign, plus an independent random perturbation at each step. Each
/// step's price becomes the next step's base. Shape is reproducible, values
/// are not.
pub fn synth_price_path(price: f64, change_24h: f64) -> Vec<f64> {
    // change_24h <= -100 would imply a non-positive week-open price
    let divisor = 1.0 + change_24h / 100.0;
    let start = if divisor > 0.0 { price / divisor } else { price };

    let trend_sign = if change_24h >= 0.0 { 1.0 } else { -1.0 };
    let mut path = Vec::with_capacity(SPARKLINE_LEN);
    let mut last = start;

    for i in 0..SPARKLINE_LEN {
        let noise = (rand::random::<f64>() - 0.5) * STEP_VOLATILITY;
        let trend =
            (i as f64 / (SPARKLINE_LEN - 1) as f64) * change_24h.abs() / 100.0 * trend_sign;
        let next = last * (1.0 + trend + noise);
        path.push(next);
        last = next;
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> Normalizer {
        Normalizer::new(Arc::new(SymbolRegistry::new()), "USDT")
    }

    fn tick(market: &str, price: f64, change: f64, volume: f64) -> Ticker24h {
        Ticker24h {
            market: market.to_string(),
            last_price: price,
            change_24h: change,
            volume_base: volume,
        }
    }

    #[test]
    fn test_derived_metric_contract() {
        let record = normalizer()
            .normalize(&tick("BTCUSDT", 50_000.0, 10.0, 2.0))
            .unwrap();

        // 1h and 7d figures are exact derivations of the 24h figure
        assert_eq!(record.change_1h, 10.0 / 24.0);
        assert_eq!(record.change_24h, 10.0);
        assert_eq!(record.change_7d, 15.0);
    }

    #[test]
    fn test_enrichment_from_registry() {
        let record = normalizer()
            .normalize(&tick("BTCUSDT", 50_000.0, 1.0, 2.0))
            .unwrap();

        assert_eq!(record.symbol, "BTC");
        assert_eq!(record.name, "Bitcoin");
        assert_eq!(record.market_cap, 50_000.0 * 19_000_000.0);
        assert_eq!(record.volume_24h, 2.0 * 50_000.0);
        assert_eq!(record.circulating_supply, 19_000_000.0);
        assert_eq!(record.max_supply, Some(21_000_000.0));
    }

    #[test]
    fn test_unknown_symbol_still_normalises() {
        let record = normalizer()
            .normalize(&tick("DOGEUSDT", 0.1, -2.0, 1000.0))
            .unwrap();

        assert_eq!(record.symbol, "DOGE");
        assert_eq!(record.name, "DOGE");
        assert_eq!(record.market_cap, 0.0);
        assert_eq!(record.max_supply, None);
    }

    #[test]
    fn test_invalid_price_is_dropped() {
        assert!(normalizer().normalize(&tick("BTCUSDT", 0.0, 1.0, 2.0)).is_none());
        assert!(normalizer().normalize(&tick("BTCUSDT", -5.0, 1.0, 2.0)).is_none());
        assert!(
            normalizer()
                .normalize(&tick("BTCUSDT", f64::NAN, 1.0, 2.0))
                .is_none()
        );
    }

    #[test]
    fn test_price_path_shape() {
        let change = 10.0;
        let path = synth_price_path(50_000.0, change);
        assert_eq!(path.len(), SPARKLINE_LEN);

        // First point deviates from the implied week-open price only by noise
        let start = 50_000.0 / (1.0 + change / 100.0);
        assert!((path[0] / start - 1.0).abs() <= STEP_VOLATILITY / 2.0 + 1e-9);

        // Every step stays inside trend + volatility bounds
        let mut last = start;
        for (i, price) in path.iter().enumerate() {
            assert!(price.is_finite() && *price > 0.0);
            let ratio = price / last;
            let trend = (i as f64 / (SPARKLINE_LEN - 1) as f64) * change / 100.0;
            assert!(
                (ratio - 1.0 - trend).abs() <= STEP_VOLATILITY / 2.0 + 1e-9,
                "step {i} ratio {ratio} outside bounds"
            );
            last = *price;
        }
    }

    #[test]
    fn test_price_path_trend_direction() {
        // With a dominant change magnitude the ramp overwhelms the noise
        let rising = synth_price_path(100.0, 200.0);
        assert!(rising.last().unwrap() > rising.first().unwrap());

        let falling = synth_price_path(100.0, -90.0);
        assert!(falling.last().unwrap() < falling.first().unwrap());
    }
}
