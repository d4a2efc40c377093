use std::collections::HashMap;

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::models::equity::TradeEvent;
use crate::models::period::Period;

/// Pre-formatted detail for the event under the pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeTooltip {
    pub sequence_index: usize,
    pub wall_time: i64,
    /// Value with 2 decimals
    pub value: String,
    /// P&L with 2 decimals and a `+` prefix when positive
    pub pnl: String,
    pub mfe: String,
    pub mae: String,
    /// `pnl >= 0`, for win/loss colouring
    pub is_win: bool,
}

/// Maps a chart x-axis key back to the originating trade event.
///
/// Rebuilt whenever the windowed sequence changes.
#[derive(Debug, Clone, Default)]
pub struct ChartQueryIndex {
    by_index: HashMap<usize, TradeEvent>,
}

impl ChartQueryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(events: &[TradeEvent]) -> Self {
        let by_index = events
            .iter()
            .map(|e| (e.sequence_index, e.clone()))
            .collect();
        Self { by_index }
    }

    pub fn lookup(&self, key: usize) -> Option<&TradeEvent> {
        self.by_index.get(&key)
    }

    pub fn len(&self) -> usize {
        self.by_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }

    pub fn tooltip(&self, key: usize) -> Option<TradeTooltip> {
        let event = self.lookup(key)?;
        let sign = if event.pnl > 0.0 { "+" } else { "" };
        Some(TradeTooltip {
            sequence_index: event.sequence_index,
            wall_time: event.wall_time,
            value: format!("{:.2}", event.value),
            pnl: format!("{sign}{:.2}", event.pnl),
            mfe: format!("+{:.2}", event.mfe),
            mae: format!("{:.2}", event.mae),
            is_win: event.pnl >= 0.0,
        })
    }

    /// Axis label for `key`: `HH:MM` on the daily view, `M/D` otherwise (UTC).
    ///
    /// Keys without an event render as an empty label.
    pub fn tick_label(&self, key: usize, period: Period) -> String {
        let Some(time) = self
            .lookup(key)
            .and_then(|e| DateTime::<Utc>::from_timestamp(e.wall_time, 0))
        else {
            return String::new();
        };
        match period {
            Period::Daily => format!("{:02}:{:02}", time.hour(), time.minute()),
            Period::Weekly | Period::All => format!("{}/{}", time.month(), time.day()),
        }
    }
}
