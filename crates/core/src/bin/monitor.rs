use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing::{info, warn};

use trading_assistant_core::bootstrap::resolve_entry;
use trading_assistant_core::errors::CoreError;
use trading_assistant_core::models::period::Period;
use trading_assistant_core::models::session::{EntryStep, SessionState};
use trading_assistant_core::models::settings::Settings;
use trading_assistant_core::providers::http_backend::HttpBackend;
use trading_assistant_core::providers::push_feed::{PushFeedClient, PushFeedConfig};
use trading_assistant_core::providers::traits::TradingBackend;
use trading_assistant_core::runtime::{forward_push, run_engine, spawn_snapshot_fetch, EngineInput};
use trading_assistant_core::storage::manager::SessionStore;
use trading_assistant_core::telemetry::init_tracing;
use trading_assistant_core::TradingAssistant;

/// Headless monitor: follows the backend snapshot and the push feed and logs
/// trade statistics for the selected period.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (JSON); defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Session file holding the onboarding flags.
    #[arg(long, default_value = "session.tas")]
    session: PathBuf,

    /// Statistics window: daily, weekly or all.
    #[arg(long, default_value = "all")]
    period: Period,

    /// Re-fetch the snapshot every N seconds (one fetch when omitted).
    #[arg(long)]
    refresh_secs: Option<u64>,

    /// Do not connect to the push feed.
    #[arg(long)]
    no_feed: bool,

    /// Log the backtest summary of this strategy before monitoring.
    #[arg(long)]
    detail: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<(), CoreError> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from_file(&path.to_string_lossy())?,
        None => Settings::default(),
    };
    settings.validate()?;
    init_tracing(&settings.log_filter);

    let mut session = SessionStore::load_or_default(&cli.session).unwrap_or_else(|e| {
        warn!(error = %e, "session file unreadable, starting fresh");
        SessionState::default()
    });

    let backend: Arc<dyn TradingBackend> = Arc::new(HttpBackend::new(&settings.api_base_url));

    let before = session.clone();
    let entry = resolve_entry(&mut session, backend.as_ref(), &settings.fetch_policy()).await;
    if session != before {
        SessionStore::save_to_file(&session, &cli.session)?;
    }
    match entry {
        EntryStep::App => info!(score = ?session.user_score, "entering app"),
        EntryStep::Intro => info!("onboarding not completed; monitoring anyway"),
    }

    let (input_tx, input_rx) = mpsc::channel(settings.channel_buffer_size.max(1));
    let mut engine = TradingAssistant::new(settings.clone());
    engine.select_period(cli.period);

    if let Some(id) = cli.detail {
        if let Some(detail) = engine.strategy_detail(backend.as_ref(), id).await {
            info!(
                strategy = %detail.name,
                roi = detail.display_roi(),
                trades = detail.display_trade_count(),
                "strategy detail"
            );
            if let Some(summary) = detail.stats() {
                info!(
                    win_rate = summary.win_rate,
                    max_drawdown_pct = summary.max_drawdown_pct,
                    profit_factor = %summary.profit_factor,
                    "strategy backtest stats"
                );
            }
        }
    }

    spawn_snapshot_fetch(Arc::clone(&backend), input_tx.clone());

    if let Some(secs) = cli.refresh_secs.filter(|s| *s > 0) {
        let backend = Arc::clone(&backend);
        let tx = input_tx.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(secs));
            interval.tick().await;
            while !tx.is_closed() {
                interval.tick().await;
                spawn_snapshot_fetch(Arc::clone(&backend), tx.clone());
            }
        });
    }

    if !cli.no_feed {
        let (messages, mut status) = PushFeedClient::new(PushFeedConfig::from_settings(&settings)).start();
        forward_push(messages, input_tx.clone());
        tokio::spawn(async move {
            while let Some(s) = status.recv().await {
                info!(status = ?s, "push feed");
            }
        });
    }

    let shutdown_tx = input_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
            let _ = shutdown_tx.send(EngineInput::Shutdown).await;
        }
    });
    drop(input_tx);

    let engine = run_engine(engine, input_rx).await;

    let period = engine.selected_period();
    match engine.get_stats(period) {
        Some(summary) => info!(
            %period,
            trades = summary.total_trades,
            net_profit = summary.net_profit,
            profit_factor = %summary.profit_factor,
            "final stats"
        ),
        None => info!(%period, "no trade events"),
    }
    Ok(())
}
