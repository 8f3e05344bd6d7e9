//! Per-step account record and the named output columns.
//!
//! A run produces one [`StepRecord`] per time index. Each record is derived
//! from the price and trade at its index plus the record immediately before
//! it, so the whole series is a first-order recurrence.

/// Account state after settling the trade at one time index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepRecord {
    pub index: usize,
    pub price: f64,
    pub trade: f64,
    pub holdings: f64,
    pub holdings_value: f64,
    pub account_balance: f64,
    pub total_equity: f64,
    pub cost_total: f64,
    pub cost_average: f64,
    pub profit: f64,
}

impl StepRecord {
    /// The index-0 record: nothing traded, nothing held, cash untouched.
    pub fn opening(index: usize, price: f64, initial_balance: f64) -> Self {
        StepRecord {
            index,
            price,
            trade: 0.0,
            holdings: 0.0,
            holdings_value: 0.0,
            account_balance: initial_balance,
            total_equity: initial_balance,
            cost_total: 0.0,
            cost_average: 0.0,
            profit: 0.0,
        }
    }

    /// Settle `trade` at `price` on top of `self`.
    ///
    /// Buying (positive trade) debits cash, selling credits it. No check is
    /// made against current holdings, so holdings may go negative.
    pub fn advance(&self, index: usize, price: f64, trade: f64, initial_balance: f64) -> Self {
        let cash_flow = price * trade;
        let holdings = self.holdings + trade;
        let cost_total = self.cost_total + cash_flow;
        let account_balance = self.account_balance - cash_flow;
        let holdings_value = holdings * price;
        let total_equity = holdings_value + account_balance;
        let profit = total_equity - initial_balance;
        StepRecord {
            index,
            price,
            trade,
            holdings,
            holdings_value,
            account_balance,
            total_equity,
            cost_total,
            cost_average: cost_average(cost_total, holdings),
            profit,
        }
    }

    pub fn is_short(&self) -> bool {
        self.holdings < 0.0
    }

    pub fn value(&self, column: Column) -> f64 {
        match column {
            Column::Price => self.price,
            Column::Trade => self.trade,
            Column::Holdings => self.holdings,
            Column::HoldingsValue => self.holdings_value,
            Column::AccountBalance => self.account_balance,
            Column::TotalEquity => self.total_equity,
            Column::CostTotal => self.cost_total,
            Column::CostAverage => self.cost_average,
            Column::Profit => self.profit,
        }
    }
}

/// Zero when flat, regardless of `cost_total`.
pub fn cost_average(cost_total: f64, holdings: f64) -> f64 {
    if holdings == 0.0 {
        0.0
    } else {
        cost_total / holdings
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Price,
    Trade,
    Holdings,
    HoldingsValue,
    AccountBalance,
    TotalEquity,
    CostTotal,
    CostAverage,
    Profit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Currency,
    Volume,
}

impl Unit {
    pub fn label(self) -> &'static str {
        match self {
            Unit::Currency => "currency",
            Unit::Volume => "volume",
        }
    }
}

impl Column {
    pub const ALL: [Column; 9] = [
        Column::Price,
        Column::Trade,
        Column::Holdings,
        Column::HoldingsValue,
        Column::AccountBalance,
        Column::TotalEquity,
        Column::CostTotal,
        Column::CostAverage,
        Column::Profit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::Price => "price",
            Column::Trade => "trade",
            Column::Holdings => "holdings",
            Column::HoldingsValue => "holdings_value",
            Column::AccountBalance => "account_balance",
            Column::TotalEquity => "total_equity",
            Column::CostTotal => "cost_total",
            Column::CostAverage => "cost_average",
            Column::Profit => "profit",
        }
    }

    pub fn unit(self) -> Unit {
        match self {
            Column::Trade | Column::Holdings => Unit::Volume,
            _ => Unit::Currency,
        }
    }
}

pub fn column_values(steps: &[StepRecord], column: Column) -> Vec<f64> {
    steps.iter().map(|s| s.value(column)).collect()
}

/// Panel layout of the chart output: which columns are drawn together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartGroup {
    PriceVsCost,
    TradeVolume,
    HoldingsVolume,
    Valuation,
    CostTotal,
}

impl ChartGroup {
    pub const ALL: [ChartGroup; 5] = [
        ChartGroup::PriceVsCost,
        ChartGroup::TradeVolume,
        ChartGroup::HoldingsVolume,
        ChartGroup::Valuation,
        ChartGroup::CostTotal,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ChartGroup::PriceVsCost => "Price vs Average Cost",
            ChartGroup::TradeVolume => "Trade Volume",
            ChartGroup::HoldingsVolume => "Holdings",
            ChartGroup::Valuation => "Account Valuation",
            ChartGroup::CostTotal => "Total Cost",
        }
    }

    pub fn columns(self) -> &'static [Column] {
        match self {
            ChartGroup::PriceVsCost => &[Column::Price, Column::CostAverage],
            ChartGroup::TradeVolume => &[Column::Trade],
            ChartGroup::HoldingsVolume => &[Column::Holdings],
            ChartGroup::Valuation => &[
                Column::HoldingsValue,
                Column::AccountBalance,
                Column::TotalEquity,
                Column::Profit,
            ],
            ChartGroup::CostTotal => &[Column::CostTotal],
        }
    }

    pub fn unit(self) -> Unit {
        self.columns()[0].unit()
    }

    /// Volume panels are drawn as bars, everything else as lines.
    pub fn is_bar(self) -> bool {
        matches!(self, ChartGroup::TradeVolume | ChartGroup::HoldingsVolume)
    }
}
