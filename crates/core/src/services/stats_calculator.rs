use crate::models::equity::TradeEvent;
use crate::models::stats::{ProfitFactor, Summary};

/// Derives summary performance metrics from a trade-event sequence.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute the summary, or `None` for an empty sequence.
    ///
    /// The synthetic first event (`pnl == 0`) counts towards `total_trades`
    /// but is neither a win nor a loss.
    pub fn stats(events: &[TradeEvent]) -> Option<Summary> {
        let first = events.first()?;
        let last = events.last()?;

        let total_trades = events.len();
        let winning_trades = events.iter().filter(|e| e.pnl > 0.0).count();
        let win_rate = winning_trades as f64 / total_trades as f64 * 100.0;

        let start_value = first.value - first.pnl;
        let end_value = last.value;
        let net_profit = end_value - start_value;
        let net_profit_pct = if start_value > 0.0 {
            net_profit / start_value * 100.0
        } else {
            0.0
        };

        let (max_drawdown, max_drawdown_pct) = Self::max_drawdown(events);

        let gross_profit: f64 = events.iter().map(|e| e.pnl).filter(|p| *p > 0.0).sum();
        let gross_loss: f64 = events
            .iter()
            .map(|e| e.pnl)
            .filter(|p| *p < 0.0)
            .map(f64::abs)
            .sum();
        let profit_factor = if gross_loss > 0.0 {
            ProfitFactor::Finite(gross_profit / gross_loss)
        } else {
            ProfitFactor::Infinite
        };

        Some(Summary {
            total_trades,
            winning_trades,
            win_rate,
            start_value,
            end_value,
            net_profit,
            net_profit_pct,
            max_drawdown,
            max_drawdown_pct,
            gross_profit,
            gross_loss,
            profit_factor,
        })
    }

    /// Largest peak-to-trough decline, absolute and as a percent of the peak.
    ///
    /// Both maxima are tracked independently; they may come from different troughs.
    pub fn max_drawdown(events: &[TradeEvent]) -> (f64, f64) {
        let mut peak = f64::NEG_INFINITY;
        let mut max_dd = 0.0_f64;
        let mut max_dd_pct = 0.0_f64;

        for event in events {
            if event.value > peak {
                peak = event.value;
            }
            let dd = peak - event.value;
            let dd_pct = if peak > 0.0 { dd / peak * 100.0 } else { 0.0 };
            max_dd = max_dd.max(dd);
            max_dd_pct = max_dd_pct.max(dd_pct);
        }

        (max_dd, max_dd_pct)
    }
}
