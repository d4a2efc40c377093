use serde::{Deserialize, Serialize};

use super::lenient::{f64_lenient, i64_lenient, opt_f64_lenient, opt_i64_lenient};

/// One OHLC bar. Only the most recent, still-forming bar is ever mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandleBar {
    #[serde(deserialize_with = "i64_lenient")]
    pub time: i64,
    #[serde(deserialize_with = "f64_lenient")]
    pub open: f64,
    #[serde(deserialize_with = "f64_lenient")]
    pub high: f64,
    #[serde(deserialize_with = "f64_lenient")]
    pub low: f64,
    #[serde(deserialize_with = "f64_lenient")]
    pub close: f64,
}

impl CandleBar {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
        }
    }
}

/// A ticker push: last trade price plus the rolling 24h window.
///
/// The exchange sends every number as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerData {
    #[serde(deserialize_with = "f64_lenient")]
    pub last: f64,

    #[serde(rename = "open24h", default, deserialize_with = "opt_f64_lenient")]
    pub open_24h: Option<f64>,

    #[serde(rename = "high24h", default, deserialize_with = "opt_f64_lenient")]
    pub high_24h: Option<f64>,

    #[serde(rename = "low24h", default, deserialize_with = "opt_f64_lenient")]
    pub low_24h: Option<f64>,

    #[serde(default, deserialize_with = "opt_i64_lenient")]
    pub ts: Option<i64>,
}

/// Header price block, rebuilt wholesale from every ticker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    /// Last trade price
    pub price: f64,

    /// `last - open24h`, or 0 when the open is missing or zero
    pub change: f64,

    /// `(last - open24h) / open24h * 100`, or 0 when the open is missing or zero
    pub change_pct: f64,

    pub high_24h: f64,

    pub low_24h: f64,
}

impl PriceSnapshot {
    pub fn from_ticker(tick: &TickerData) -> Self {
        let open = tick.open_24h.unwrap_or(0.0);
        let (change, change_pct) = if open != 0.0 {
            let change = tick.last - open;
            (change, change / open * 100.0)
        } else {
            (0.0, 0.0)
        };
        Self {
            price: tick.last,
            change,
            change_pct,
            high_24h: tick.high_24h.unwrap_or(0.0),
            low_24h: tick.low_24h.unwrap_or(0.0),
        }
    }

    /// Whether the header should render in the "up" colour.
    pub fn is_up(&self) -> bool {
        self.change >= 0.0
    }
}

/// A filled order, as pushed by the feed or converted from trade history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    /// "buy" or "sell"; absent on some exchange payloads
    #[serde(default)]
    pub side: Option<String>,

    #[serde(rename = "fillPx", alias = "price", deserialize_with = "f64_lenient")]
    pub fill_px: f64,

    #[serde(rename = "sz", alias = "size", default, deserialize_with = "opt_f64_lenient")]
    pub size: Option<f64>,

    #[serde(alias = "time", default, deserialize_with = "opt_i64_lenient")]
    pub ts: Option<i64>,
}

impl Fill {
    pub fn is_buy(&self) -> bool {
        self.side.as_deref().is_some_and(|s| s.eq_ignore_ascii_case("buy"))
    }

    /// Upper-cased side label, `UNKNOWN` when the side is missing.
    pub fn side_label(&self) -> String {
        self.side
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_uppercase)
            .unwrap_or_else(|| "UNKNOWN".to_string())
    }
}

/// One row of `GET /trade-history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    #[serde(default)]
    pub side: Option<String>,

    #[serde(default, deserialize_with = "opt_f64_lenient")]
    pub price: Option<f64>,

    #[serde(default, deserialize_with = "opt_f64_lenient")]
    pub size: Option<f64>,

    #[serde(default, deserialize_with = "opt_i64_lenient")]
    pub time: Option<i64>,
}

impl From<TradeRecord> for Fill {
    fn from(record: TradeRecord) -> Self {
        Self {
            side: record.side,
            fill_px: record.price.unwrap_or(0.0),
            size: record.size,
            ts: record.time,
        }
    }
}
