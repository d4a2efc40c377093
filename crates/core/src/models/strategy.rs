use serde::{Deserialize, Serialize};

use super::equity::{EquitySample, TradeEvent};
use super::lenient::{opt_f64_lenient, vec_lenient};
use super::marker::RawMarker;
use super::stats::Summary;
use crate::services::stats_calculator::StatsCalculator;
use crate::services::trade_events::TradeEventExtractor;

/// Payload of a strategy change (`POST /select-strategy`, or a chat reply).
///
/// `None` leaves the corresponding half of the snapshot untouched;
/// `Some(vec![])` clears the override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyUpdate {
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub markers: Option<Vec<RawMarker>>,

    #[serde(default)]
    pub equity_curve: Option<Vec<EquitySample>>,
}

impl StrategyUpdate {
    pub fn new(markers: Vec<RawMarker>, equity_curve: Vec<EquitySample>) -> Self {
        Self {
            markers: Some(markers),
            equity_curve: Some(equity_curve),
            ..Default::default()
        }
    }
}

/// Account value after the n-th closed trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradePoint {
    #[serde(default)]
    pub trade_num: Option<u32>,

    #[serde(deserialize_with = "super::lenient::f64_lenient")]
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BacktestSummary {
    #[serde(default, deserialize_with = "opt_f64_lenient")]
    pub roi: Option<f64>,

    #[serde(default, deserialize_with = "opt_f64_lenient")]
    pub mdd: Option<f64>,

    #[serde(default, deserialize_with = "opt_f64_lenient")]
    pub final_equity: Option<f64>,

    #[serde(default)]
    pub trade_count: u64,

    #[serde(default, deserialize_with = "vec_lenient")]
    pub equity_curve: Vec<EquitySample>,

    #[serde(default, deserialize_with = "vec_lenient")]
    pub equity_over_trades: Vec<TradePoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizerSummary {
    /// A number, or "Auto"
    #[serde(default)]
    pub best_leverage: Option<serde_json::Value>,

    #[serde(default)]
    pub best_risk_percent: Option<serde_json::Value>,

    #[serde(default, deserialize_with = "opt_f64_lenient")]
    pub expected_return: Option<f64>,

    #[serde(default, deserialize_with = "opt_f64_lenient")]
    pub expected_mdd: Option<f64>,
}

/// `GET /strategy/detail/{id}`: one strategy with its backtest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyDetail {
    #[serde(default)]
    pub id: u32,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub detailed_description: Option<String>,

    #[serde(default)]
    pub risk_level: Option<String>,

    #[serde(default)]
    pub backtest: BacktestSummary,

    #[serde(default)]
    pub optimizer: Option<OptimizerSummary>,
}

impl StrategyDetail {
    /// The optimizer's expected return when present, else the backtest ROI.
    pub fn display_roi(&self) -> f64 {
        self.optimizer
            .as_ref()
            .and_then(|o| o.expected_return)
            .filter(|r| *r != 0.0)
            .or(self.backtest.roi)
            .unwrap_or(0.0)
    }

    /// Reported trade count, falling back to the per-trade curve length
    /// when the backend reports zero.
    pub fn display_trade_count(&self) -> usize {
        if self.backtest.trade_count > 0 {
            self.backtest.trade_count as usize
        } else {
            self.backtest.equity_over_trades.len()
        }
    }

    /// Per-trade curve as `(trade number, value)`, numbered from 1.
    pub fn trade_points(&self) -> Vec<(usize, f64)> {
        self.backtest
            .equity_over_trades
            .iter()
            .enumerate()
            .map(|(idx, point)| (idx + 1, point.value))
            .collect()
    }

    /// Trade events over this strategy's full equity curve.
    pub fn trade_events(&self) -> Vec<TradeEvent> {
        TradeEventExtractor::extract(&self.backtest.equity_curve)
    }

    pub fn stats(&self) -> Option<Summary> {
        StatsCalculator::stats(&self.trade_events())
    }
}
