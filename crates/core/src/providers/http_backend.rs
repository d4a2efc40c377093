use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::traits::TradingBackend;
use crate::errors::CoreError;
use crate::models::marker::RawMarker;
use crate::models::period::Period;
use crate::models::responses::{
    BacktestResults, ChartDataResponse, PersonalityResponse, ReportResponse,
    TradeHistoryResponse,
};
use crate::models::strategy::{StrategyDetail, StrategyUpdate};

/// REST client for the trading backend.
///
/// - **Transport**: plain HTTP/JSON, no authentication.
/// - **Timeouts**: none at this layer. The single guarded call at startup is
///   wrapped by the caller.
/// - **Errors**: transport failures map to [`CoreError::Network`]; a body that
///   does not decode, or that carries an `error` field, maps to
///   [`CoreError::Api`].
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct ReportRequest<'a> {
    period: &'a str,
}

#[derive(Serialize)]
struct StrategySelectRequest {
    strategy_id: u32,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CoreError> {
        self.client
            .get(self.url(path))
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                endpoint: path.into(),
                message: format!("Failed to parse response: {e}"),
            })
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, CoreError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                endpoint: path.into(),
                message: format!("Failed to parse response: {e}"),
            })
    }
}

/// Turn an `error` field reported by the backend into an API error.
fn check_error(endpoint: &str, error: Option<&str>) -> Result<(), CoreError> {
    match error {
        Some(message) => Err(CoreError::Api {
            endpoint: endpoint.into(),
            message: message.into(),
        }),
        None => Ok(()),
    }
}

#[async_trait]
impl TradingBackend for HttpBackend {
    fn name(&self) -> &str {
        "HTTP"
    }

    async fn get_chart_data(&self) -> Result<ChartDataResponse, CoreError> {
        let resp: ChartDataResponse = self.get_json("/chart-data").await?;
        check_error("/chart-data", resp.error.as_deref())?;
        Ok(resp)
    }

    async fn get_backtest_results(&self) -> Result<BacktestResults, CoreError> {
        let resp: BacktestResults = self.get_json("/backtest-results").await?;
        check_error("/backtest-results", resp.error.as_deref())?;
        Ok(resp)
    }

    async fn get_chart_markers(&self) -> Result<Vec<RawMarker>, CoreError> {
        // Bare array on success; an error object is reported as such.
        let value: serde_json::Value = self.get_json("/chart-markers").await?;
        check_error("/chart-markers", value.get("error").and_then(|e| e.as_str()))?;
        RawMarker::parse_lenient(&value)
    }

    async fn get_trade_history(&self) -> Result<TradeHistoryResponse, CoreError> {
        let resp: TradeHistoryResponse = self.get_json("/trade-history").await?;
        check_error("/trade-history", resp.error.as_deref())?;
        Ok(resp)
    }

    async fn generate_report(&self, period: Period) -> Result<String, CoreError> {
        let body = ReportRequest {
            period: period.report_key(),
        };
        let resp: ReportResponse = self.post_json("/generate-report", &body).await?;
        Ok(resp.report.unwrap_or_default())
    }

    async fn get_personality(&self) -> Result<PersonalityResponse, CoreError> {
        let resp: PersonalityResponse = self.get_json("/personality").await?;
        check_error("/personality", resp.error.as_deref())?;
        Ok(resp)
    }

    async fn select_strategy(&self, strategy_id: u32) -> Result<StrategyUpdate, CoreError> {
        let body = StrategySelectRequest { strategy_id };
        let resp: StrategyUpdate = self.post_json("/select-strategy", &body).await?;
        if resp.status.as_deref() == Some("error") {
            return Err(CoreError::Api {
                endpoint: "/select-strategy".into(),
                message: resp.message.unwrap_or_else(|| "strategy change rejected".into()),
            });
        }
        Ok(resp)
    }

    async fn get_strategy_detail(&self, strategy_id: u32) -> Result<StrategyDetail, CoreError> {
        self.get_json(&format!("/strategy/detail/{strategy_id}")).await
    }
}
