use crate::models::equity::{EquitySample, TradeEvent};
use crate::services::time_normalizer::TimeNormalizer;

/// Reduces a dense equity series to one point per trading decision.
///
/// Equity curves are sampled far more often than trades close; charting every
/// sample draws a noisy line. Only the boundary samples and the trade exits
/// (non-zero MFE or MAE) become [`TradeEvent`]s.
pub struct TradeEventExtractor;

impl TradeEventExtractor {
    /// Extract trade events from samples in their given order.
    ///
    /// A sample is selected when it is the first, the last, or a trade exit.
    /// `pnl` is measured against the previously *selected* value, and the
    /// first event's `pnl` is always exactly 0.
    pub fn extract(samples: &[EquitySample]) -> Vec<TradeEvent> {
        let last_idx = match samples.len() {
            0 => return Vec::new(),
            n => n - 1,
        };

        let mut events = Vec::new();
        let mut last_selected: Option<f64> = None;

        for (idx, sample) in samples.iter().enumerate() {
            let is_boundary = idx == 0 || idx == last_idx;
            if !is_boundary && !sample.is_trade_exit() {
                continue;
            }

            let pnl = match last_selected {
                Some(prev) => sample.value - prev,
                None => 0.0,
            };
            events.push(TradeEvent {
                sequence_index: events.len(),
                wall_time: TimeNormalizer::normalize(sample.time),
                value: sample.value,
                pnl,
                mfe: sample.mfe_or_zero(),
                mae: sample.mae_or_zero(),
            });
            last_selected = Some(sample.value);
        }

        events
    }
}
