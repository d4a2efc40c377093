//! Single-actor event loop around [`TradingAssistant`].
//!
//! Fetch completions, push messages and user actions all arrive on one mpsc
//! queue and are applied strictly in arrival order, so the engine state is
//! never mutated concurrently and needs no locks.

use std::ops::ControlFlow;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::models::equity::TradeEvent;
use crate::models::marker::RawMarker;
use crate::models::period::Period;
use crate::models::push::PushMessage;
use crate::models::responses::{BacktestResults, ChartDataResponse, TradeHistoryResponse};
use crate::models::stats::Summary;
use crate::models::strategy::StrategyUpdate;
use crate::providers::traits::TradingBackend;
use crate::TradingAssistant;

/// Everything the engine reacts to.
#[derive(Debug)]
pub enum EngineInput {
    ChartData(ChartDataResponse),
    BacktestResults(BacktestResults),
    ChartMarkers(Vec<RawMarker>),
    TradeHistory(TradeHistoryResponse),
    StrategyChanged(StrategyUpdate),
    Push(PushMessage),
    SelectPeriod(Period),
    /// Pointer query on the selected period's chart
    Query {
        index: usize,
        reply: oneshot::Sender<Option<TradeEvent>>,
    },
    Stats {
        period: Period,
        reply: oneshot::Sender<Option<Summary>>,
    },
    Shutdown,
}

/// Drain `inputs` until `Shutdown` or until every sender is gone, then hand
/// the engine back.
pub async fn run_engine(
    mut engine: TradingAssistant,
    mut inputs: mpsc::Receiver<EngineInput>,
) -> TradingAssistant {
    info!("engine loop started");
    while let Some(input) = inputs.recv().await {
        if handle_input(&mut engine, input).is_break() {
            break;
        }
    }
    info!("engine loop stopped");
    engine
}

/// Apply one input to the engine.
pub fn handle_input(engine: &mut TradingAssistant, input: EngineInput) -> ControlFlow<()> {
    match input {
        EngineInput::ChartData(data) => engine.apply_chart_data(data),
        EngineInput::BacktestResults(results) => {
            engine.apply_backtest_results(results);
            log_stats(engine);
        }
        EngineInput::ChartMarkers(markers) => engine.apply_chart_markers(markers),
        EngineInput::TradeHistory(history) => engine.apply_trade_history(history),
        EngineInput::StrategyChanged(update) => {
            engine.on_strategy_change(update);
            log_stats(engine);
        }
        EngineInput::Push(message) => {
            engine.on_push_message(message);
        }
        EngineInput::SelectPeriod(period) => {
            engine.select_period(period);
            log_stats(engine);
        }
        EngineInput::Query { index, reply } => {
            // Asker gone; nothing to do.
            let _ = reply.send(engine.query_by_index(index).cloned());
        }
        EngineInput::Stats { period, reply } => {
            let _ = reply.send(engine.get_stats(period));
        }
        EngineInput::Shutdown => return ControlFlow::Break(()),
    }
    ControlFlow::Continue(())
}

fn log_stats(engine: &TradingAssistant) {
    let period = engine.selected_period();
    match engine.get_stats(period) {
        Some(summary) => info!(
            %period,
            trades = summary.total_trades,
            win_rate = summary.win_rate,
            net_profit = summary.net_profit,
            max_drawdown_pct = summary.max_drawdown_pct,
            profit_factor = %summary.profit_factor,
            "stats"
        ),
        None => debug!(%period, "no trade events"),
    }
}

/// Fetch the snapshot endpoints concurrently and enqueue whatever succeeds.
/// Failures are logged and skipped; nothing is retried.
pub fn spawn_snapshot_fetch(
    backend: Arc<dyn TradingBackend>,
    inputs: mpsc::Sender<EngineInput>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let (chart, backtest, markers, history) = tokio::join!(
            backend.get_chart_data(),
            backend.get_backtest_results(),
            backend.get_chart_markers(),
            backend.get_trade_history(),
        );

        let mut batch = Vec::with_capacity(4);
        match chart {
            Ok(data) => batch.push(EngineInput::ChartData(data)),
            Err(e) => warn!(error = %e, "chart data fetch failed"),
        }
        match backtest {
            Ok(results) => batch.push(EngineInput::BacktestResults(results)),
            Err(e) => warn!(error = %e, "backtest results fetch failed"),
        }
        match markers {
            Ok(markers) => batch.push(EngineInput::ChartMarkers(markers)),
            Err(e) => warn!(error = %e, "chart markers fetch failed"),
        }
        match history {
            Ok(history) => batch.push(EngineInput::TradeHistory(history)),
            Err(e) => warn!(error = %e, "trade history fetch failed"),
        }

        for input in batch {
            if inputs.send(input).await.is_err() {
                debug!("engine gone, snapshot discarded");
                return;
            }
        }
    })
}

/// Forward push-feed messages into the engine queue until either side closes.
pub fn forward_push(
    mut messages: mpsc::Receiver<PushMessage>,
    inputs: mpsc::Sender<EngineInput>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(message) = messages.recv().await {
            if inputs.send(EngineInput::Push(message)).await.is_err() {
                break;
            }
        }
        debug!("push forwarding stopped");
    })
}
