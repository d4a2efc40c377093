pub mod bootstrap;
pub mod errors;
pub mod models;
pub mod providers;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod telemetry;

use models::{
    equity::{EquitySample, TradeEvent},
    marker::{Marker, RawMarker},
    market::{CandleBar, Fill, PriceSnapshot},
    period::Period,
    push::PushMessage,
    report::ReportLine,
    responses::{BacktestResults, ChartDataResponse, TradeHistoryResponse},
    settings::Settings,
    stats::Summary,
    strategy::{StrategyDetail, StrategyUpdate},
};
use providers::traits::TradingBackend;
use services::{
    chart_adapter::{ChartAdapter, ChartSurface},
    chart_index::{ChartQueryIndex, TradeTooltip},
    chat_session::ChatSession,
    live_feed::{LiveFeedReconciler, LivePatch},
    marker_aggregator::MarkerAggregator,
    period_windower::PeriodWindower,
    report_service::ReportService,
    stats_calculator::StatsCalculator,
    trade_events::TradeEventExtractor,
};
use tracing::{debug, info, warn};

/// Main entry point for the trading-assistant core library.
///
/// Owns two independent domains. The snapshot domain (candles, equity curves,
/// static markers and everything derived from them) is replaced wholesale on
/// every reload. The live domain (forming candle, recent fills, live markers)
/// only changes through push messages and its own seeding calls.
#[must_use]
pub struct TradingAssistant {
    settings: Settings,

    // snapshot domain
    candles: Vec<CandleBar>,
    backtest_equity: Vec<EquitySample>,
    file_markers: Vec<RawMarker>,
    strategy_equity: Vec<EquitySample>,
    strategy_markers: Vec<RawMarker>,
    trade_events: Vec<TradeEvent>,
    period: Period,
    windowed: Vec<TradeEvent>,
    query_index: ChartQueryIndex,

    // live domain
    live: LiveFeedReconciler,

    merged_markers: Vec<Marker>,
    windower: PeriodWindower,
    chart: ChartAdapter,
    chat: ChatSession,
    reports: ReportService,
}

impl std::fmt::Debug for TradingAssistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradingAssistant")
            .field("candles", &self.candles.len())
            .field("trade_events", &self.trade_events.len())
            .field("period", &self.period)
            .field("windowed", &self.windowed.len())
            .field("markers", &self.merged_markers.len())
            .field("recent_fills", &self.live.fill_count())
            .field("chart", &self.chart)
            .finish()
    }
}

impl Default for TradingAssistant {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl TradingAssistant {
    pub fn new(settings: Settings) -> Self {
        let windower = PeriodWindower::with_fallbacks(
            settings.daily_fallback_events,
            settings.weekly_fallback_events,
        );
        let live = LiveFeedReconciler::with_capacity(settings.recent_fills_capacity);
        Self {
            settings,
            candles: Vec::new(),
            backtest_equity: Vec::new(),
            file_markers: Vec::new(),
            strategy_equity: Vec::new(),
            strategy_markers: Vec::new(),
            trade_events: Vec::new(),
            period: Period::default(),
            windowed: Vec::new(),
            query_index: ChartQueryIndex::new(),
            live,
            merged_markers: Vec::new(),
            windower,
            chart: ChartAdapter::new(),
            chat: ChatSession::new(),
            reports: ReportService::new(),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ── Chart Surface ───────────────────────────────────────────────

    /// Hand a rendering surface to the engine and draw the current state on it.
    pub fn attach_chart(&mut self, surface: Box<dyn ChartSurface>) {
        self.chart.attach(surface);
        self.chart.set_candles(&self.candles);
        if let Some(bar) = self.live.current_candle() {
            self.chart.update_candle(bar);
        }
        self.chart.set_trade_events(&self.windowed);
        self.chart.set_markers(&self.merged_markers);
    }

    /// Release the surface; later patches become no-ops.
    pub fn detach_chart(&mut self) -> Option<Box<dyn ChartSurface>> {
        self.chart.detach()
    }

    // ── Snapshot Domain ─────────────────────────────────────────────

    /// Replace the candle series with a `/chart-data` snapshot.
    pub fn apply_chart_data(&mut self, data: ChartDataResponse) {
        if let Some(error) = data.error {
            warn!(%error, "chart data reported an error, keeping previous candles");
            return;
        }
        self.candles = data.candlesticks;
        self.live.seed_candles(&self.candles);
        self.chart.set_candles(&self.candles);
        info!(candles = self.candles.len(), "chart data applied");
    }

    /// Replace the backtest equity curve and file markers.
    pub fn apply_backtest_results(&mut self, results: BacktestResults) {
        if let Some(error) = results.error {
            warn!(%error, "backtest results reported an error, keeping previous snapshot");
            return;
        }
        self.backtest_equity = results.equity_curve;
        self.file_markers = results.markers;
        self.recompute_snapshot();
        info!(
            samples = self.backtest_equity.len(),
            events = self.trade_events.len(),
            "backtest results applied"
        );
    }

    /// Replace the live marker list with a fresh `/chart-markers` load.
    pub fn apply_chart_markers(&mut self, markers: Vec<RawMarker>) {
        self.live.seed_markers(markers);
        self.remerge_markers();
    }

    /// Seed the recent fills from `/trade-history`.
    pub fn apply_trade_history(&mut self, history: TradeHistoryResponse) {
        if let Some(error) = history.error {
            warn!(%error, "trade history reported an error, keeping previous fills");
            return;
        }
        self.live.seed_fills(history.trades);
        debug!(fills = self.live.fill_count(), "trade history applied");
    }

    /// A strategy switch replaces whichever halves of the snapshot it carries.
    pub fn on_strategy_change(&mut self, update: StrategyUpdate) {
        if let Some(markers) = update.markers {
            self.strategy_markers = markers;
        }
        if let Some(equity) = update.equity_curve {
            self.strategy_equity = equity;
        }
        self.recompute_snapshot();
        info!(
            events = self.trade_events.len(),
            markers = self.merged_markers.len(),
            "strategy change applied"
        );
    }

    /// Fetch the four snapshot endpoints. Each failure is logged and leaves
    /// its part of the state unchanged.
    pub async fn load_initial(&mut self, backend: &dyn TradingBackend) {
        match backend.get_chart_data().await {
            Ok(data) => self.apply_chart_data(data),
            Err(e) => warn!(backend = backend.name(), error = %e, "chart data fetch failed"),
        }
        match backend.get_backtest_results().await {
            Ok(results) => self.apply_backtest_results(results),
            Err(e) => warn!(backend = backend.name(), error = %e, "backtest results fetch failed"),
        }
        match backend.get_chart_markers().await {
            Ok(markers) => self.apply_chart_markers(markers),
            Err(e) => warn!(backend = backend.name(), error = %e, "chart markers fetch failed"),
        }
        match backend.get_trade_history().await {
            Ok(history) => self.apply_trade_history(history),
            Err(e) => warn!(backend = backend.name(), error = %e, "trade history fetch failed"),
        }
    }

    /// Switch strategy on the backend and adopt its snapshot override.
    /// Returns `false` when the request failed; state is then unchanged.
    pub async fn select_strategy(&mut self, backend: &dyn TradingBackend, strategy_id: u32) -> bool {
        match backend.select_strategy(strategy_id).await {
            Ok(update) => {
                if let Some(message) = update.message.as_deref() {
                    self.chat.push_bot(message);
                }
                self.chat.clear_recommendations();
                self.on_strategy_change(update);
                true
            }
            Err(e) => {
                warn!(strategy_id, error = %e, "strategy selection failed");
                false
            }
        }
    }

    /// Load one strategy's backtest for the detail view. The engine state is
    /// not touched; `None` when the request failed.
    pub async fn strategy_detail(
        &self,
        backend: &dyn TradingBackend,
        strategy_id: u32,
    ) -> Option<StrategyDetail> {
        match backend.get_strategy_detail(strategy_id).await {
            Ok(detail) => {
                debug!(
                    strategy_id,
                    samples = detail.backtest.equity_curve.len(),
                    "strategy detail loaded"
                );
                Some(detail)
            }
            Err(e) => {
                warn!(strategy_id, error = %e, "strategy detail fetch failed");
                None
            }
        }
    }

    // ── Live Domain ─────────────────────────────────────────────────

    /// Apply one push message, in arrival order.
    pub fn on_push_message(&mut self, message: PushMessage) -> LivePatch {
        let kind = message.kind();
        let patch = self.live.apply(message);
        match &patch {
            LivePatch::Candle(bar) => {
                self.chart.update_candle(bar);
            }
            LivePatch::Markers => self.remerge_markers(),
            LivePatch::Price | LivePatch::Fills => {}
        }
        debug!(kind, "push message applied");
        patch
    }

    #[must_use]
    pub fn price_snapshot(&self) -> &PriceSnapshot {
        self.live.price_snapshot()
    }

    /// Recent fills, newest first.
    #[must_use]
    pub fn recent_fills(&self) -> Vec<&Fill> {
        self.live.recent_fills().collect()
    }

    #[must_use]
    pub fn current_candle(&self) -> Option<&CandleBar> {
        self.live.current_candle()
    }

    #[must_use]
    pub fn candles(&self) -> &[CandleBar] {
        &self.candles
    }

    // ── Markers ─────────────────────────────────────────────────────

    /// The merged marker layer: static markers plus live markers, deduplicated
    /// and time-ordered.
    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.merged_markers
    }

    // ── Analytics ───────────────────────────────────────────────────

    /// Every trade event of the active equity curve.
    #[must_use]
    pub fn trade_events(&self) -> &[TradeEvent] {
        &self.trade_events
    }

    /// Trade events inside `period`, re-indexed from zero.
    #[must_use]
    pub fn get_window(&self, period: Period) -> Vec<TradeEvent> {
        self.windower.window(&self.trade_events, period)
    }

    /// Summary of the events inside `period`; `None` when there are none.
    #[must_use]
    pub fn get_stats(&self, period: Period) -> Option<Summary> {
        StatsCalculator::stats(&self.get_window(period))
    }

    /// Change the period shown on the chart and rebuild the query index.
    pub fn select_period(&mut self, period: Period) {
        if self.period == period {
            return;
        }
        self.period = period;
        self.rewindow();
    }

    #[must_use]
    pub fn selected_period(&self) -> Period {
        self.period
    }

    /// Events of the selected period, as drawn on the chart.
    #[must_use]
    pub fn windowed_events(&self) -> &[TradeEvent] {
        &self.windowed
    }

    /// Event under chart x-axis key `index` in the selected period.
    #[must_use]
    pub fn query_by_index(&self, index: usize) -> Option<&TradeEvent> {
        self.query_index.lookup(index)
    }

    #[must_use]
    pub fn tooltip(&self, index: usize) -> Option<TradeTooltip> {
        self.query_index.tooltip(index)
    }

    #[must_use]
    pub fn tick_label(&self, index: usize) -> String {
        self.query_index.tick_label(index, self.period)
    }

    // ── Reports ─────────────────────────────────────────────────────

    /// Generate and cache the report for `period`. Never fails: a failed
    /// request caches a failure message instead.
    pub async fn fetch_report(&mut self, backend: &dyn TradingBackend, period: Period) -> &str {
        self.reports.fetch_report(backend, period).await
    }

    #[must_use]
    pub fn report(&self, period: Period) -> Option<&str> {
        self.reports.cached(period)
    }

    #[must_use]
    pub fn report_lines(&self, period: Period) -> Vec<ReportLine> {
        self.reports.formatted(period)
    }

    // ── Chat ────────────────────────────────────────────────────────

    #[must_use]
    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    pub fn chat_mut(&mut self) -> &mut ChatSession {
        &mut self.chat
    }

    // ── Recomputation ───────────────────────────────────────────────

    fn active_equity(&self) -> &[EquitySample] {
        if self.strategy_equity.is_empty() {
            &self.backtest_equity
        } else {
            &self.strategy_equity
        }
    }

    fn active_static_markers(&self) -> &[RawMarker] {
        if self.strategy_markers.is_empty() {
            &self.file_markers
        } else {
            &self.strategy_markers
        }
    }

    /// Total replace of everything derived from the snapshot.
    fn recompute_snapshot(&mut self) {
        self.trade_events = TradeEventExtractor::extract(self.active_equity());
        self.rewindow();
        self.remerge_markers();
    }

    fn rewindow(&mut self) {
        self.windowed = self.windower.window(&self.trade_events, self.period);
        self.query_index = ChartQueryIndex::build(&self.windowed);
        self.chart.set_trade_events(&self.windowed);
    }

    fn remerge_markers(&mut self) {
        self.merged_markers =
            MarkerAggregator::merge(&[self.active_static_markers(), self.live.live_markers()]);
        self.chart.set_markers(&self.merged_markers);
    }
}
