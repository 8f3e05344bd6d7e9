//! Run summary statistics derived from a finished step sequence.

use super::step::StepRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub steps: usize,
    pub initial_balance: f64,
    pub final_price: f64,
    pub final_holdings: f64,
    pub final_balance: f64,
    pub final_equity: f64,
    pub profit: f64,
    pub peak_equity: f64,
    pub trough_equity: f64,
    pub max_drawdown: f64,
    pub min_balance: f64,
    pub total_bought: f64,
    pub total_sold: f64,
    pub short_steps: usize,
}

impl RunSummary {
    pub fn compute(steps: &[StepRecord], initial_balance: f64) -> Self {
        let Some(last) = steps.last() else {
            return RunSummary {
                steps: 0,
                initial_balance,
                final_price: 0.0,
                final_holdings: 0.0,
                final_balance: initial_balance,
                final_equity: initial_balance,
                profit: 0.0,
                peak_equity: initial_balance,
                trough_equity: initial_balance,
                max_drawdown: 0.0,
                min_balance: initial_balance,
                total_bought: 0.0,
                total_sold: 0.0,
                short_steps: 0,
            };
        };

        let peak_equity = steps
            .iter()
            .map(|s| s.total_equity)
            .fold(f64::NEG_INFINITY, f64::max);
        let trough_equity = steps
            .iter()
            .map(|s| s.total_equity)
            .fold(f64::INFINITY, f64::min);
        let min_balance = steps
            .iter()
            .map(|s| s.account_balance)
            .fold(f64::INFINITY, f64::min);

        let total_bought: f64 = steps.iter().filter(|s| s.trade > 0.0).map(|s| s.trade).sum();
        let total_sold: f64 = steps
            .iter()
            .filter(|s| s.trade < 0.0)
            .map(|s| s.trade.abs())
            .sum();

        RunSummary {
            steps: steps.len(),
            initial_balance,
            final_price: last.price,
            final_holdings: last.holdings,
            final_balance: last.account_balance,
            final_equity: last.total_equity,
            profit: last.profit,
            peak_equity,
            trough_equity,
            max_drawdown: compute_drawdown(steps),
            min_balance,
            total_bought,
            total_sold,
            short_steps: steps.iter().filter(|s| s.is_short()).count(),
        }
    }
}

/// Largest peak-to-trough fall in equity as a fraction of the peak.
/// Only positive peaks count; equity can start at zero or go negative.
fn compute_drawdown(steps: &[StepRecord]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;

    for step in steps {
        if step.total_equity > peak {
            peak = step.total_equity;
        } else if peak > 0.0 {
            let dd = (peak - step.total_equity) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}
