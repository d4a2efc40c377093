use tracing::debug;

use crate::errors::CoreError;
use crate::models::equity::TradeEvent;
use crate::models::marker::Marker;
use crate::models::market::CandleBar;

/// A rendering surface owned by the UI layer.
///
/// Implementations return [`CoreError::SurfaceDisposed`] (or any other error)
/// when the underlying chart is gone; the adapter swallows it.
pub trait ChartSurface: Send {
    /// Replace the whole candle series.
    fn set_candles(&mut self, bars: &[CandleBar]) -> Result<(), CoreError>;

    /// Patch or append the most recent candle.
    fn update_candle(&mut self, bar: &CandleBar) -> Result<(), CoreError>;

    /// Replace the marker layer.
    fn set_markers(&mut self, markers: &[Marker]) -> Result<(), CoreError>;

    /// Replace the trade-event series.
    fn set_trade_events(&mut self, events: &[TradeEvent]) -> Result<(), CoreError>;

    fn is_disposed(&self) -> bool {
        false
    }
}

/// The only path from analytics output to the chart.
///
/// A missing or disposed surface makes every push a no-op; surface errors are
/// logged and dropped, never propagated. Each push reports whether the surface
/// accepted it.
#[derive(Default)]
pub struct ChartAdapter {
    surface: Option<Box<dyn ChartSurface>>,
}

impl ChartAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, surface: Box<dyn ChartSurface>) {
        self.surface = Some(surface);
    }

    /// Drop the surface, returning it to the caller.
    pub fn detach(&mut self) -> Option<Box<dyn ChartSurface>> {
        self.surface.take()
    }

    pub fn is_attached(&self) -> bool {
        self.surface.as_ref().is_some_and(|s| !s.is_disposed())
    }

    pub fn set_candles(&mut self, bars: &[CandleBar]) -> bool {
        self.push("set_candles", |s| s.set_candles(bars))
    }

    pub fn update_candle(&mut self, bar: &CandleBar) -> bool {
        self.push("update_candle", |s| s.update_candle(bar))
    }

    pub fn set_markers(&mut self, markers: &[Marker]) -> bool {
        self.push("set_markers", |s| s.set_markers(markers))
    }

    pub fn set_trade_events(&mut self, events: &[TradeEvent]) -> bool {
        self.push("set_trade_events", |s| s.set_trade_events(events))
    }

    fn push<F>(&mut self, op: &'static str, f: F) -> bool
    where
        F: FnOnce(&mut dyn ChartSurface) -> Result<(), CoreError>,
    {
        let Some(surface) = self.surface.as_deref_mut() else {
            return false;
        };
        if surface.is_disposed() {
            debug!(op, "chart surface disposed, patch skipped");
            return false;
        }
        match f(surface) {
            Ok(()) => true,
            Err(e) => {
                debug!(op, error = %e, "chart patch failed, ignored");
                false
            }
        }
    }
}

impl std::fmt::Debug for ChartAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartAdapter")
            .field("attached", &self.is_attached())
            .finish()
    }
}
