use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::marker::RawMarker;
use crate::models::period::Period;
use crate::models::responses::{
    BacktestResults, ChartDataResponse, PersonalityResponse, TradeHistoryResponse,
};
use crate::models::strategy::{StrategyDetail, StrategyUpdate};

/// Request/response boundary to the trading backend.
///
/// The engine only ever talks to the backend through this trait, so tests and
/// alternative transports plug in without touching the analytics code.
/// Implementations report a payload carrying an `error` field as
/// [`CoreError::Api`].
#[async_trait]
pub trait TradingBackend: Send + Sync {
    /// Human-readable name of this backend (for logs).
    fn name(&self) -> &str;

    /// `GET /chart-data`
    async fn get_chart_data(&self) -> Result<ChartDataResponse, CoreError>;

    /// `GET /backtest-results`
    async fn get_backtest_results(&self) -> Result<BacktestResults, CoreError>;

    /// `GET /chart-markers`
    async fn get_chart_markers(&self) -> Result<Vec<RawMarker>, CoreError>;

    /// `GET /trade-history`
    async fn get_trade_history(&self) -> Result<TradeHistoryResponse, CoreError>;

    /// `POST /generate-report`, returns the report text.
    async fn generate_report(&self, period: Period) -> Result<String, CoreError>;

    /// `GET /personality`
    async fn get_personality(&self) -> Result<PersonalityResponse, CoreError>;

    /// `POST /select-strategy`, returns the snapshot override for the chosen strategy.
    async fn select_strategy(&self, strategy_id: u32) -> Result<StrategyUpdate, CoreError>;

    /// `GET /strategy/detail/{id}`
    async fn get_strategy_detail(&self, strategy_id: u32) -> Result<StrategyDetail, CoreError>;
}
