use serde::{Deserialize, Serialize};

use super::market::{CandleBar, Fill, TickerData};
use super::marker::RawMarker;

/// A message from the streaming channel, tagged by `type` with its payload in `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum PushMessage {
    Ticker(TickerData),
    Fill(Fill),
    Marker(RawMarker),
    NewCandle(CandleBar),
}

impl PushMessage {
    /// Wire tag of this message, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            PushMessage::Ticker(_) => "ticker",
            PushMessage::Fill(_) => "fill",
            PushMessage::Marker(_) => "marker",
            PushMessage::NewCandle(_) => "new_candle",
        }
    }
}
