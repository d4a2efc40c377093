pub mod chart_adapter;
pub mod chart_index;
pub mod chat_session;
pub mod live_feed;
pub mod marker_aggregator;
pub mod period_windower;
pub mod report_service;
pub mod stats_calculator;
pub mod time_normalizer;
pub mod trade_events;
