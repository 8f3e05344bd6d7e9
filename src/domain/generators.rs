//! Built-in price and trade sources.
//!
//! Closed-form curves and fixed trading patterns used by the demo presets,
//! plus table lookups that back the CSV adapter.

use std::collections::BTreeMap;

use crate::domain::error::SimError;
use crate::ports::price_port::PriceSource;
use crate::ports::trade_port::TradeSource;

/// `base + amplitude * sin(t / period)`, nudged down by `shock` on even
/// indices and up by `shock` on odd ones.
#[derive(Debug, Clone, PartialEq)]
pub struct SinePriceSource {
    pub base: f64,
    pub amplitude: f64,
    pub period: f64,
    pub shock: f64,
    pub duration: i64,
}

impl SinePriceSource {
    /// Zero-centred wave, 40 steps.
    pub fn basic() -> Self {
        SinePriceSource {
            base: 0.0,
            amplitude: 5.0,
            period: 6.0,
            shock: 0.0,
            duration: 40,
        }
    }

    /// Oscillating market with a one-unit zigzag on top, 50 steps.
    pub fn t_plus_0() -> Self {
        SinePriceSource {
            base: 10.0,
            amplitude: 10.0,
            period: 6.0,
            shock: 1.0,
            duration: 50,
        }
    }
}

impl PriceSource for SinePriceSource {
    fn price_at(&self, index: usize) -> Result<f64, SimError> {
        let t = index as f64;
        let shock = if index % 2 == 0 { -self.shock } else { self.shock };
        Ok(self.base + self.amplitude * (t / self.period).sin() + shock)
    }

    fn duration(&self) -> i64 {
        self.duration
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstantPriceSource {
    pub price: f64,
    pub duration: i64,
}

impl ConstantPriceSource {
    pub fn new(price: f64, duration: i64) -> Self {
        ConstantPriceSource { price, duration }
    }
}

impl PriceSource for ConstantPriceSource {
    fn price_at(&self, _index: usize) -> Result<f64, SimError> {
        Ok(self.price)
    }

    fn duration(&self) -> i64 {
        self.duration
    }
}

/// Prices looked up by index from a fixed table.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePriceSource {
    prices: Vec<f64>,
}

impl TablePriceSource {
    pub fn new(prices: Vec<f64>) -> Self {
        TablePriceSource { prices }
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }
}

impl PriceSource for TablePriceSource {
    fn price_at(&self, index: usize) -> Result<f64, SimError> {
        self.prices
            .get(index)
            .copied()
            .ok_or_else(|| SimError::Source {
                index,
                reason: format!("no price for index (table has {} rows)", self.prices.len()),
            })
    }

    fn duration(&self) -> i64 {
        self.prices.len() as i64
    }
}

/// Trades `even` on even indices and `odd` on odd indices.
#[derive(Debug, Clone, PartialEq)]
pub struct AlternatingTradeSource {
    pub even: f64,
    pub odd: f64,
}

impl AlternatingTradeSource {
    pub fn new(even: f64, odd: f64) -> Self {
        AlternatingTradeSource { even, odd }
    }

    /// Sell 200 on even steps, buy 200 on odd steps.
    pub fn basic() -> Self {
        AlternatingTradeSource::new(-200.0, 200.0)
    }
}

impl TradeSource for AlternatingTradeSource {
    fn trade_at(&self, index: usize) -> Result<f64, SimError> {
        Ok(if index % 2 == 0 { self.even } else { self.odd })
    }
}

/// Builds a position over the first `opening_steps` indices, then buys
/// `swing` on even indices and sells it on odd ones.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalpingTradeSource {
    pub opening_quantity: f64,
    pub opening_steps: usize,
    pub swing: f64,
}

impl ScalpingTradeSource {
    pub fn t_plus_0() -> Self {
        ScalpingTradeSource {
            opening_quantity: 500.0,
            opening_steps: 1,
            swing: 200.0,
        }
    }
}

impl TradeSource for ScalpingTradeSource {
    fn trade_at(&self, index: usize) -> Result<f64, SimError> {
        if index <= self.opening_steps {
            Ok(self.opening_quantity)
        } else if index % 2 == 0 {
            Ok(self.swing)
        } else {
            Ok(-self.swing)
        }
    }
}

/// Sparse trade schedule. Indices without an entry trade nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableTradeSource {
    trades: BTreeMap<usize, f64>,
}

impl TableTradeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(index, quantity)` pairs, summing repeated indices.
    pub fn from_pairs<I: IntoIterator<Item = (usize, f64)>>(pairs: I) -> Self {
        let mut table = TableTradeSource::new();
        for (index, quantity) in pairs {
            table.add(index, quantity);
        }
        table
    }

    pub fn add(&mut self, index: usize, quantity: f64) {
        *self.trades.entry(index).or_insert(0.0) += quantity;
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }
}

impl TradeSource for TableTradeSource {
    fn trade_at(&self, index: usize) -> Result<f64, SimError> {
        Ok(self.trades.get(&index).copied().unwrap_or(0.0))
    }
}
