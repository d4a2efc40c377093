use crate::models::equity::TradeEvent;
use crate::models::period::Period;

/// Raw events shown for a sparse daily window.
pub const DAILY_FALLBACK_EVENTS: usize = 20;

/// Raw events shown for a sparse weekly window.
pub const WEEKLY_FALLBACK_EVENTS: usize = 50;

/// Filters trade events to a reporting window and re-indexes the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodWindower {
    daily_fallback: usize,
    weekly_fallback: usize,
}

impl PeriodWindower {
    pub fn new() -> Self {
        Self::with_fallbacks(DAILY_FALLBACK_EVENTS, WEEKLY_FALLBACK_EVENTS)
    }

    pub fn with_fallbacks(daily_fallback: usize, weekly_fallback: usize) -> Self {
        Self {
            daily_fallback,
            weekly_fallback,
        }
    }

    /// Keep the events inside `period`, measured back from the last event.
    ///
    /// When a daily or weekly window holds fewer than 2 events, the time filter
    /// is dropped and the last N raw events are taken instead, so a quiet
    /// period still draws a readable line. `sequence_index` is renumbered
    /// 0..k-1 over the result.
    pub fn window(&self, events: &[TradeEvent], period: Period) -> Vec<TradeEvent> {
        let (Some(last), Some(span)) = (events.last(), period.span_seconds()) else {
            return Self::reindex(events);
        };

        let start_time = last.wall_time.saturating_sub(span);
        let filtered: Vec<&TradeEvent> = events
            .iter()
            .filter(|e| e.wall_time >= start_time)
            .collect();

        if filtered.len() >= 2 {
            return Self::reindex(filtered.into_iter());
        }

        let limit = self.fallback_for(period);
        let start = events.len().saturating_sub(limit);
        Self::reindex(&events[start..])
    }

    fn fallback_for(&self, period: Period) -> usize {
        match period {
            Period::Daily => self.daily_fallback,
            Period::Weekly => self.weekly_fallback,
            Period::All => usize::MAX,
        }
    }

    fn reindex<'a>(events: impl IntoIterator<Item = &'a TradeEvent>) -> Vec<TradeEvent> {
        events
            .into_iter()
            .enumerate()
            .map(|(idx, event)| TradeEvent {
                sequence_index: idx,
                ..event.clone()
            })
            .collect()
    }
}

impl Default for PeriodWindower {
    fn default() -> Self {
        Self::new()
    }
}
