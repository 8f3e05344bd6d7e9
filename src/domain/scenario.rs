//! Simulation run parameters and the named demo scenarios.

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::domain::generators::{
    AlternatingTradeSource, ConstantPriceSource, ScalpingTradeSource, SinePriceSource,
};

pub const DEFAULT_INITIAL_BALANCE: f64 = 10_000.0;

#[derive(Debug, Clone, PartialEq)]
pub enum PriceSpec {
    Sine(SinePriceSource),
    Constant(ConstantPriceSource),
    Csv {
        path: PathBuf,
        column: Option<String>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    },
}

impl PriceSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            PriceSpec::Sine(_) => "sine",
            PriceSpec::Constant(_) => "constant",
            PriceSpec::Csv { .. } => "csv",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TradeSpec {
    Alternating(AlternatingTradeSource),
    Scalping(ScalpingTradeSource),
    Csv { path: PathBuf },
}

impl TradeSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            TradeSpec::Alternating(_) => "alternating",
            TradeSpec::Scalping(_) => "scalping",
            TradeSpec::Csv { .. } => "csv",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub name: String,
    pub initial_balance: f64,
    pub price: PriceSpec,
    pub trades: TradeSpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Preset {
    /// Zero-centred sine wave traded in and out every step
    #[value(name = "basic")]
    Basic,
    /// Build a position, then buy the dips and sell the pops
    #[value(name = "t-plus-0")]
    TPlus0,
}

impl Preset {
    pub fn config(self, initial_balance: f64) -> SimulationConfig {
        match self {
            Preset::Basic => SimulationConfig {
                name: "Basic alternating".into(),
                initial_balance,
                price: PriceSpec::Sine(SinePriceSource::basic()),
                trades: TradeSpec::Alternating(AlternatingTradeSource::basic()),
            },
            Preset::TPlus0 => SimulationConfig {
                name: "T+0 scalping".into(),
                initial_balance,
                price: PriceSpec::Sine(SinePriceSource::t_plus_0()),
                trades: TradeSpec::Scalping(ScalpingTradeSource::t_plus_0()),
            },
        }
    }
}
