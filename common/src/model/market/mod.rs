//! Market models: instrument symbols and price snapshots

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Ticker identifying a tradable instrument (e.g., "BTC")
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Create a new symbol
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    /// The ticker as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(symbol: &str) -> Self {
        Self(symbol.to_string())
    }
}

impl From<String> for Symbol {
    fn from(symbol: String) -> Self {
        Self(symbol)
    }
}

/// Complete symbol to price mapping at one point in time.
///
/// Snapshots are immutable once built; a simulation tick produces a new one
/// with [`PriceSnapshot::map_prices`] instead of editing in place. The JSON
/// form is a flat object, e.g. `{"ADA":1.5,"BTC":50000.0,"ETH":3000.0}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceSnapshot {
    prices: BTreeMap<Symbol, f64>,
}

impl PriceSnapshot {
    /// The simulated instruments the desk starts with
    pub fn default_instruments() -> Self {
        [("BTC", 50000.00), ("ETH", 3000.00), ("ADA", 1.50)]
            .into_iter()
            .map(|(symbol, price)| (Symbol::from(symbol), price))
            .collect()
    }

    /// Current price of a symbol, if it is registered
    pub fn price(&self, symbol: &str) -> Option<f64> {
        self.prices.get(symbol).copied()
    }

    /// Whether the symbol is a registered instrument
    pub fn contains(&self, symbol: &str) -> bool {
        self.prices.contains_key(symbol)
    }

    /// Registered symbols in ticker order
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.prices.keys()
    }

    /// Symbol and price pairs in ticker order
    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, f64)> {
        self.prices.iter().map(|(symbol, price)| (symbol, *price))
    }

    /// Number of registered symbols
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Whether no symbols are registered
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Build the next snapshot over the same symbol set
    pub fn map_prices<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&Symbol, f64) -> f64,
    {
        Self {
            prices: self
                .prices
                .iter()
                .map(|(symbol, price)| (symbol.clone(), f(symbol, *price)))
                .collect(),
        }
    }
}

impl FromIterator<(Symbol, f64)> for PriceSnapshot {
    fn from_iter<I: IntoIterator<Item = (Symbol, f64)>>(iter: I) -> Self {
        Self {
            prices: iter.into_iter().collect(),
        }
    }
}
