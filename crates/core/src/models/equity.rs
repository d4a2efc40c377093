use serde::{Deserialize, Serialize};

/// One sampled point of account equity over wall-clock time.
///
/// Samples arrive from the backtest snapshot or from a strategy change and are
/// never mutated; everything derived from them is rebuilt from scratch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquitySample {
    /// Epoch timestamp, seconds or milliseconds
    #[serde(deserialize_with = "super::lenient::i64_lenient")]
    pub time: i64,

    /// Total account value at `time`
    #[serde(deserialize_with = "super::lenient::f64_lenient")]
    pub value: f64,

    /// Maximum favorable excursion; non-zero marks a trade exit
    #[serde(default, deserialize_with = "super::lenient::opt_f64_lenient")]
    pub mfe: Option<f64>,

    /// Maximum adverse excursion; non-zero marks a trade exit
    #[serde(default, deserialize_with = "super::lenient::opt_f64_lenient")]
    pub mae: Option<f64>,
}

impl EquitySample {
    pub fn new(time: i64, value: f64) -> Self {
        Self {
            time,
            value,
            mfe: None,
            mae: None,
        }
    }

    /// A sample that coincides with a trade exit.
    pub fn exit(time: i64, value: f64, mfe: f64, mae: f64) -> Self {
        Self {
            time,
            value,
            mfe: Some(mfe),
            mae: Some(mae),
        }
    }

    pub fn mfe_or_zero(&self) -> f64 {
        self.mfe.unwrap_or(0.0)
    }

    pub fn mae_or_zero(&self) -> f64 {
        self.mae.unwrap_or(0.0)
    }

    /// Whether this sample records a trade exit.
    pub fn is_trade_exit(&self) -> bool {
        self.mfe_or_zero() != 0.0 || self.mae_or_zero() != 0.0
    }
}

/// A discrete, chartable trade point derived from an equity series.
///
/// `sequence_index` is the chart x-axis: a dense 0-based count, so events are
/// evenly spaced no matter how much wall time separates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeEvent {
    pub sequence_index: usize,

    /// Normalized epoch seconds of the originating sample
    pub wall_time: i64,

    pub value: f64,

    /// `value` minus the previous event's value; 0 for the first event
    pub pnl: f64,

    pub mfe: f64,

    pub mae: f64,
}
