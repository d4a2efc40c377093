use serde::{Deserialize, Serialize};

/// Gross profit over gross loss.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProfitFactor {
    Finite(f64),
    /// No losing events, so the ratio is undefined
    Infinite,
}

impl ProfitFactor {
    pub fn as_f64(&self) -> f64 {
        match self {
            ProfitFactor::Finite(v) => *v,
            ProfitFactor::Infinite => f64::INFINITY,
        }
    }
}

impl std::fmt::Display for ProfitFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfitFactor::Finite(v) => write!(f, "{v:.3}"),
            ProfitFactor::Infinite => write!(f, "∞"),
        }
    }
}

/// Performance metrics over a trade-event sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of events, including the synthetic first event
    pub total_trades: usize,

    /// Events with `pnl > 0`
    pub winning_trades: usize,

    /// `winning_trades / total_trades * 100`
    pub win_rate: f64,

    /// Reconstructed pre-trade baseline: first value minus first pnl
    pub start_value: f64,

    pub end_value: f64,

    pub net_profit: f64,

    /// Percent of `start_value`; 0 when the baseline is not positive
    pub net_profit_pct: f64,

    pub max_drawdown: f64,

    pub max_drawdown_pct: f64,

    pub gross_profit: f64,

    pub gross_loss: f64,

    pub profit_factor: ProfitFactor,
}
