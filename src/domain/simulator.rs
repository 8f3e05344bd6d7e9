//! Simulation engine.
//!
//! Walks the time axis once, querying the price source at every index and
//! the trade source at every index after the first, and settles each trade
//! against the previous step's account state.

use crate::domain::error::SimError;
use crate::domain::step::StepRecord;
use crate::ports::price_port::PriceSource;
use crate::ports::trade_port::TradeSource;

/// Run a full simulation and return one record per time index.
///
/// A non-positive duration yields an empty sequence. The first source error
/// aborts the run and is returned as is.
pub fn run(
    price_source: &dyn PriceSource,
    trade_source: &dyn TradeSource,
    initial_balance: f64,
) -> Result<Vec<StepRecord>, SimError> {
    Simulation::new(price_source, trade_source, initial_balance).run()
}

/// The inputs of one run. Holds no accumulator state of its own.
pub struct Simulation<'a> {
    price_source: &'a dyn PriceSource,
    trade_source: &'a dyn TradeSource,
    initial_balance: f64,
}

impl<'a> Simulation<'a> {
    pub fn new(
        price_source: &'a dyn PriceSource,
        trade_source: &'a dyn TradeSource,
        initial_balance: f64,
    ) -> Self {
        Simulation {
            price_source,
            trade_source,
            initial_balance,
        }
    }

    pub fn duration(&self) -> usize {
        usize::try_from(self.price_source.duration()).unwrap_or(0)
    }

    pub fn initial_balance(&self) -> f64 {
        self.initial_balance
    }

    /// Lazy step sequence starting from index 0. Every call starts over.
    pub fn steps(&self) -> Steps<'a> {
        Steps {
            price_source: self.price_source,
            trade_source: self.trade_source,
            initial_balance: self.initial_balance,
            duration: self.duration(),
            index: 0,
            prev: None,
            failed: false,
        }
    }

    pub fn run(&self) -> Result<Vec<StepRecord>, SimError> {
        let mut out = Vec::with_capacity(self.duration());
        for step in self.steps() {
            out.push(step?);
        }
        Ok(out)
    }
}

/// Iterator over the step records of one run.
///
/// Yields nothing further after an error.
pub struct Steps<'a> {
    price_source: &'a dyn PriceSource,
    trade_source: &'a dyn TradeSource,
    initial_balance: f64,
    duration: usize,
    index: usize,
    prev: Option<StepRecord>,
    failed: bool,
}

impl Steps<'_> {
    fn settle(&self, index: usize) -> Result<StepRecord, SimError> {
        let price = self.price_source.price_at(index)?;
        match &self.prev {
            None => Ok(StepRecord::opening(index, price, self.initial_balance)),
            Some(prev) => {
                let trade = self.trade_source.trade_at(index)?;
                Ok(prev.advance(index, price, trade, self.initial_balance))
            }
        }
    }
}

impl Iterator for Steps<'_> {
    type Item = Result<StepRecord, SimError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.index >= self.duration {
            return None;
        }
        match self.settle(self.index) {
            Ok(record) => {
                self.prev = Some(record);
                self.index += 1;
                Some(Ok(record))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            return (0, Some(0));
        }
        let remaining = self.duration - self.index;
        (0, Some(remaining))
    }
}

impl std::iter::FusedIterator for Steps<'_> {}
