use std::collections::VecDeque;

use tracing::debug;

use crate::models::marker::RawMarker;
use crate::models::market::{CandleBar, Fill, PriceSnapshot, TickerData, TradeRecord};
use crate::models::push::PushMessage;

/// Default number of fills kept.
pub const RECENT_FILLS_CAPACITY: usize = 20;

/// The visual update implied by one applied push message.
#[derive(Debug, Clone, PartialEq)]
pub enum LivePatch {
    /// Header price changed; no forming candle to patch
    Price,
    /// Header price changed and the forming candle was patched or replaced
    Candle(CandleBar),
    /// The recent-fills list changed
    Fills,
    /// The live marker list grew; the merged layer must be recomputed
    Markers,
}

/// Applies push events onto the live-patch domain: the forming candle, the
/// recent fills and the live markers.
///
/// This domain is independent of snapshot reloads.
#[derive(Debug, Clone)]
pub struct LiveFeedReconciler {
    current_candle: Option<CandleBar>,
    recent_fills: VecDeque<Fill>,
    price_snapshot: PriceSnapshot,
    live_markers: Vec<RawMarker>,
    fills_capacity: usize,
}

impl LiveFeedReconciler {
    pub fn new() -> Self {
        Self::with_capacity(RECENT_FILLS_CAPACITY)
    }

    pub fn with_capacity(fills_capacity: usize) -> Self {
        Self {
            current_candle: None,
            recent_fills: VecDeque::with_capacity(fills_capacity),
            price_snapshot: PriceSnapshot::default(),
            live_markers: Vec::new(),
            fills_capacity: fills_capacity.max(1),
        }
    }

    /// Dispatch a push message to its handler.
    pub fn apply(&mut self, message: PushMessage) -> LivePatch {
        match message {
            PushMessage::Ticker(tick) => self.on_ticker(&tick),
            PushMessage::NewCandle(bar) => self.on_new_candle(bar),
            PushMessage::Fill(fill) => self.on_fill(fill),
            PushMessage::Marker(marker) => self.on_marker(marker),
        }
    }

    /// Rebuild the price snapshot and patch the forming candle in place.
    ///
    /// `open` and `time` of the candle are never touched.
    pub fn on_ticker(&mut self, tick: &TickerData) -> LivePatch {
        self.price_snapshot = PriceSnapshot::from_ticker(tick);

        match self.current_candle.as_mut() {
            Some(candle) => {
                candle.close = tick.last;
                candle.high = candle.high.max(tick.last);
                candle.low = candle.low.min(tick.last);
                LivePatch::Candle(candle.clone())
            }
            None => LivePatch::Price,
        }
    }

    /// Commit the forming candle and start a new one.
    pub fn on_new_candle(&mut self, bar: CandleBar) -> LivePatch {
        debug!(time = bar.time, "new candle");
        self.current_candle = Some(bar.clone());
        LivePatch::Candle(bar)
    }

    /// Prepend a fill, keeping only the most recent ones.
    pub fn on_fill(&mut self, fill: Fill) -> LivePatch {
        self.recent_fills.push_front(fill);
        self.recent_fills.truncate(self.fills_capacity);
        LivePatch::Fills
    }

    /// Append a live marker; merging happens downstream.
    pub fn on_marker(&mut self, marker: RawMarker) -> LivePatch {
        self.live_markers.push(marker);
        LivePatch::Markers
    }

    /// Adopt the last bar of a chart-data snapshot as the forming candle.
    pub fn seed_candles(&mut self, bars: &[CandleBar]) {
        if let Some(last) = bars.last() {
            self.current_candle = Some(last.clone());
            self.price_snapshot.price = last.close;
        }
    }

    /// Replace the fills with the newest rows of a trade-history fetch.
    pub fn seed_fills(&mut self, trades: Vec<TradeRecord>) {
        self.recent_fills = trades
            .into_iter()
            .take(self.fills_capacity)
            .map(Fill::from)
            .collect();
    }

    /// Replace the live marker list; only a fresh load clears it.
    pub fn seed_markers(&mut self, markers: Vec<RawMarker>) {
        self.live_markers = markers;
    }

    pub fn current_candle(&self) -> Option<&CandleBar> {
        self.current_candle.as_ref()
    }

    /// Recent fills, newest first.
    pub fn recent_fills(&self) -> impl Iterator<Item = &Fill> {
        self.recent_fills.iter()
    }

    pub fn fill_count(&self) -> usize {
        self.recent_fills.len()
    }

    pub fn price_snapshot(&self) -> &PriceSnapshot {
        &self.price_snapshot
    }

    pub fn live_markers(&self) -> &[RawMarker] {
        &self.live_markers
    }
}

impl Default for LiveFeedReconciler {
    fn default() -> Self {
        Self::new()
    }
}
