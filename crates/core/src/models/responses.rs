//! Response bodies of the backend REST endpoints.
//!
//! Every collection defaults to empty and skips elements that fail to parse,
//! so a partial payload degrades to "less data" rather than an error.

use serde::{Deserialize, Serialize};

use super::equity::EquitySample;
use super::lenient::vec_lenient;
use super::marker::RawMarker;
use super::market::{CandleBar, TradeRecord};

/// `GET /chart-data`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartDataResponse {
    #[serde(default, deserialize_with = "vec_lenient")]
    pub candlesticks: Vec<CandleBar>,

    #[serde(default)]
    pub error: Option<String>,
}

/// `GET /backtest-results`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BacktestResults {
    #[serde(default, deserialize_with = "vec_lenient")]
    pub equity_curve: Vec<EquitySample>,

    #[serde(default, deserialize_with = "vec_lenient")]
    pub markers: Vec<RawMarker>,

    #[serde(default)]
    pub error: Option<String>,
}

/// `GET /trade-history`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TradeHistoryResponse {
    #[serde(default, deserialize_with = "vec_lenient")]
    pub trades: Vec<TradeRecord>,

    #[serde(default)]
    pub error: Option<String>,
}

/// `POST /generate-report`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportResponse {
    #[serde(default)]
    pub report: Option<String>,
}

/// `GET /personality`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonalityResponse {
    #[serde(default)]
    pub score: i64,

    #[serde(default)]
    pub error: Option<String>,
}
