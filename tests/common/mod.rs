#![allow(dead_code)]

use std::cell::Cell;
use std::io::Write;

use tradesim::domain::error::SimError;
use tradesim::ports::price_port::PriceSource;
use tradesim::ports::trade_port::TradeSource;

/// Price source backed by a closure and an explicit duration.
pub struct FnPriceSource<F: Fn(usize) -> f64> {
    pub f: F,
    pub duration: i64,
}

impl<F: Fn(usize) -> f64> PriceSource for FnPriceSource<F> {
    fn price_at(&self, index: usize) -> Result<f64, SimError> {
        Ok((self.f)(index))
    }

    fn duration(&self) -> i64 {
        self.duration
    }
}

pub struct FnTradeSource<F: Fn(usize) -> f64>(pub F);

impl<F: Fn(usize) -> f64> TradeSource for FnTradeSource<F> {
    fn trade_at(&self, index: usize) -> Result<f64, SimError> {
        Ok((self.0)(index))
    }
}

/// Trade source that counts calls and fails at one index.
pub struct MockTradeSource {
    pub quantity: f64,
    pub fail_at: Option<usize>,
    pub calls: Cell<usize>,
}

impl MockTradeSource {
    pub fn new(quantity: f64) -> Self {
        Self {
            quantity,
            fail_at: None,
            calls: Cell::new(0),
        }
    }

    pub fn failing_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }
}

impl TradeSource for MockTradeSource {
    fn trade_at(&self, index: usize) -> Result<f64, SimError> {
        self.calls.set(self.calls.get() + 1);
        if self.fail_at == Some(index) {
            return Err(SimError::Source {
                index,
                reason: "mock trade feed failure".into(),
            });
        }
        Ok(self.quantity)
    }
}

pub fn write_temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
