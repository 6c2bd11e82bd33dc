//! Static symbol registry for the tracked asset set.
//!
//! A closed, hand-maintained table mapping base symbols to display metadata.
//! Extending the supported set is a data change, not a logic change.

use smol_str::SmolStr;

/// Registry metadata for one asset.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolInfo {
    /// Human-readable display name
    pub name: SmolStr,
    /// Circulating supply in base units
    pub circulating_supply: f64,
    /// Maximum supply in base units, absent for uncapped assets
    pub max_supply: Option<f64>,
}

/// Closed lookup table: symbol -> display name and supply figures.
///
/// Lookups never fail: an unknown symbol resolves to itself with a zero
/// circulating supply and no max supply.
#[derive(Debug, Clone, Default)]
pub struct SymbolRegistry;

/// Supported symbol set: (symbol, name, circulating supply, max supply).
const SYMBOL_TABLE: &[(&str, &str, f64, Option<f64>)] = &[
    ("BTC", "Bitcoin", 19_000_000.0, Some(21_000_000.0)),
    ("ETH", "Ethereum", 120_000_000.0, None),
    ("BNB", "Binance Coin", 155_000_000.0, Some(200_000_000.0)),
    ("XRP", "Ripple", 45_000_000_000.0, Some(100_000_000_000.0)),
    ("ADA", "Cardano", 35_000_000_000.0, Some(45_000_000_000.0)),
];

impl SymbolRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Resolve a base symbol to its metadata.
    pub fn lookup(&self, symbol: &str) -> SymbolInfo {
        SYMBOL_TABLE
            .iter()
            .find(|(sym, _, _, _)| *sym == symbol)
            .map(|(_, name, circulating, max)| SymbolInfo {
                name: SmolStr::new(*name),
                circulating_supply: *circulating,
                max_supply: *max,
            })
            .unwrap_or_else(|| SymbolInfo {
                name: SmolStr::new(symbol),
                circulating_supply: 0.0,
                max_supply: None,
            })
    }

    /// Symbols in the supported set, in table order.
    pub fn tracked_symbols(&self) -> impl Iterator<Item = SmolStr> + '_ {
        SYMBOL_TABLE.iter().map(|(sym, _, _, _)| SmolStr::new(*sym))
    }
}
