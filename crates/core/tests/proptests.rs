use std::collections::HashSet;

use proptest::prelude::*;
use trading_assistant_core::models::equity::EquitySample;
use trading_assistant_core::models::marker::RawMarker;
use trading_assistant_core::models::period::Period;
use trading_assistant_core::services::marker_aggregator::MarkerAggregator;
use trading_assistant_core::services::period_windower::PeriodWindower;
use trading_assistant_core::services::stats_calculator::StatsCalculator;
use trading_assistant_core::services::time_normalizer::TimeNormalizer;
use trading_assistant_core::services::trade_events::TradeEventExtractor;

fn raw_marker() -> impl Strategy<Value = RawMarker> {
    (
        prop_oneof![
            1_600_000_000i64..1_700_000_000,
            1_600_000_000_000i64..1_700_000_000_000,
        ],
        prop::sample::select(vec!["BUY", "SELL", "TP", "SL"]),
    )
        .prop_map(|(time, text)| RawMarker::new(time, text))
}

fn equity_series() -> impl Strategy<Value = Vec<EquitySample>> {
    prop::collection::vec((1i64..3_600, 1.0f64..10_000.0, prop::bool::ANY), 1..120).prop_map(
        |steps| {
            let mut time = 1_700_000_000;
            steps
                .into_iter()
                .map(|(gap, value, exit)| {
                    time += gap;
                    if exit {
                        EquitySample::exit(time, value, 1.0, -1.0)
                    } else {
                        EquitySample::new(time, value)
                    }
                })
                .collect()
        },
    )
}

fn period() -> impl Strategy<Value = Period> {
    prop_oneof![Just(Period::Daily), Just(Period::Weekly), Just(Period::All)]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    #[test]
    fn normalized_time_is_never_millis(t in 0i64..4_000_000_000_000) {
        let n = TimeNormalizer::normalize(t);
        prop_assert!(!TimeNormalizer::is_millis(n));
        prop_assert_eq!(TimeNormalizer::normalize(n), n);
    }

    #[test]
    fn merged_markers_sorted_and_unique(
        a in prop::collection::vec(raw_marker(), 0..40),
        b in prop::collection::vec(raw_marker(), 0..40),
    ) {
        let merged = MarkerAggregator::merge(&[a.as_slice(), b.as_slice()]);

        prop_assert!(merged.windows(2).all(|w| w[0].time <= w[1].time));

        let keys: HashSet<(i64, &str)> = merged.iter().map(|m| m.key()).collect();
        prop_assert_eq!(keys.len(), merged.len());

        let expected: HashSet<(i64, String)> = a
            .iter()
            .chain(b.iter())
            .filter_map(|m| Some((TimeNormalizer::normalize(m.time?), m.text.clone()?)))
            .collect();
        prop_assert_eq!(expected.len(), merged.len());
    }

    #[test]
    fn marker_merge_is_idempotent(markers in prop::collection::vec(raw_marker(), 0..60)) {
        let once = MarkerAggregator::merge(&[markers.as_slice()]);
        let raw: Vec<RawMarker> = once.iter().cloned().map(RawMarker::from).collect();
        let twice = MarkerAggregator::merge(&[raw.as_slice()]);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn extracted_events_are_dense_and_start_flat(samples in equity_series()) {
        let events = TradeEventExtractor::extract(&samples);

        prop_assert!(!events.is_empty());
        prop_assert_eq!(events[0].pnl, 0.0);
        prop_assert_eq!(events[0].value, samples[0].value);
        prop_assert_eq!(events.last().map(|e| e.value), samples.last().map(|s| s.value));
        for (idx, event) in events.iter().enumerate() {
            prop_assert_eq!(event.sequence_index, idx);
        }

        let exits = samples
            .iter()
            .skip(1)
            .take(samples.len().saturating_sub(2))
            .filter(|s| s.is_trade_exit())
            .count();
        let boundaries = if samples.len() == 1 { 1 } else { 2 };
        prop_assert_eq!(events.len(), exits + boundaries);
    }

    #[test]
    fn pnl_telescopes_to_net_profit(samples in equity_series()) {
        let events = TradeEventExtractor::extract(&samples);
        let summary = StatsCalculator::stats(&events).unwrap();

        let pnl_sum: f64 = events.iter().map(|e| e.pnl).sum();
        prop_assert!((pnl_sum - summary.net_profit).abs() < 1e-6);
        prop_assert!(summary.max_drawdown >= 0.0);
        prop_assert!((0.0..=100.0).contains(&summary.win_rate));
    }

    #[test]
    fn windows_are_reindexed_suffixes(samples in equity_series(), period in period()) {
        let events = TradeEventExtractor::extract(&samples);
        let window = PeriodWindower::new().window(&events, period);

        prop_assert!(!window.is_empty());
        prop_assert!(window.len() <= events.len());
        for (idx, event) in window.iter().enumerate() {
            prop_assert_eq!(event.sequence_index, idx);
        }

        let offset = events.len() - window.len();
        for (w, e) in window.iter().zip(&events[offset..]) {
            prop_assert_eq!(w.wall_time, e.wall_time);
            prop_assert_eq!(w.value, e.value);
        }
    }
}
